use crate::model::Catalog;

pub fn stores(catalog: &Catalog) {
    for store in &catalog.stores {
        println!("{}", store);
    }
}

pub fn categories(catalog: &Catalog) {
    for category in &catalog.categories {
        println!("{}", category);
    }
}
