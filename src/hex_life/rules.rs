//! Birth/survival rules on the six-neighbour hex tiling

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum neighbour count on a hex tiling
pub const MAX_NEIGHBOURS: u8 = 6;

/// Birth and survival neighbour counts. Defaults to B2/S35.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexLifeRules {
    pub birth: Vec<u8>,
    pub survival: Vec<u8>,
}

impl Default for HexLifeRules {
    fn default() -> Self {
        Self {
            birth: vec![2],
            survival: vec![3, 5],
        }
    }
}

impl HexLifeRules {
    /// Check if a cell should be alive in the next generation given its current state and neighbour count
    pub fn next_state(&self, alive: bool, neighbour_count: u8) -> bool {
        if alive {
            self.survival.contains(&neighbour_count)
        } else {
            self.birth.contains(&neighbour_count)
        }
    }

    pub fn validate(&self) -> Result<()> {
        for &count in self.birth.iter().chain(self.survival.iter()) {
            if count > MAX_NEIGHBOURS {
                anyhow::bail!(
                    "Neighbour count {} in rule {} exceeds the hex maximum of {}",
                    count,
                    self,
                    MAX_NEIGHBOURS
                );
            }
        }
        if self.birth.contains(&0) {
            anyhow::bail!("B0 rules are not supported: isolated dead cells would be born every tick");
        }
        Ok(())
    }
}

impl fmt::Display for HexLifeRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for count in &self.birth {
            write!(f, "{}", count)?;
        }
        write!(f, "/S")?;
        for count in &self.survival {
            write!(f, "{}", count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_logic() {
        let rules = HexLifeRules::default();
        assert!(rules.next_state(false, 2)); // Birth with 2 neighbours
        assert!(!rules.next_state(false, 3));
        assert!(rules.next_state(true, 3)); // Survival with 3
        assert!(rules.next_state(true, 5)); // Survival with 5
        assert!(!rules.next_state(true, 2));
        assert!(!rules.next_state(true, 4));
        assert!(!rules.next_state(true, 6));
        assert!(!rules.next_state(true, 0));
        assert!(!rules.next_state(false, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(HexLifeRules::default().to_string(), "B2/S35");
    }

    #[test]
    fn test_validation() {
        assert!(HexLifeRules::default().validate().is_ok());
        let too_many = HexLifeRules { birth: vec![7], survival: vec![] };
        assert!(too_many.validate().is_err());
        let b0 = HexLifeRules { birth: vec![0], survival: vec![] };
        assert!(b0.validate().is_err());
    }
}
