//! Name gate in front of the bulk-clear commands
//!
//! This is a courtesy check for a trusted group, not authentication.

use crate::config::Config;
use crate::error::{ListError, Result};

pub const MSG_NOT_ADMIN: &str = "Only list admins can clear the list.";

pub struct AdminGate {
    names: Vec<String>,
}

impl AdminGate {
    pub fn new(names: &[String]) -> Self {
        Self {
            names: names
                .iter()
                .map(|n| n.trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.admin.names)
    }

    /// Trimmed, case-insensitive match; refuses everyone when unconfigured
    pub fn check(&self, name: &str) -> Result<()> {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && self.names.contains(&name) {
            Ok(())
        } else {
            tracing::warn!("Admin command refused for {:?}", name);
            Err(ListError::validation(MSG_NOT_ADMIN))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_name_passes() {
        let gate = AdminGate::new(&["Stefan".to_string()]);
        assert!(gate.check("Stefan").is_ok());
        assert!(gate.check("  stefan ").is_ok());
        assert!(matches!(gate.check("Mallory"), Err(ListError::Validation(_))));
        assert!(gate.check("").is_err());
    }

    #[test]
    fn test_unconfigured_gate_refuses_everyone() {
        let gate = AdminGate::from_config(&Config::default());
        assert!(gate.check("admin").is_err());
        assert!(AdminGate::new(&["  ".to_string()]).check("").is_err());
    }
}
