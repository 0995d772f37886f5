//! Formula registry
//!
//! Keeps every available formula unique by id and sorted by `(priority, id)`,
//! which is also the order the host's settings screen lists them in.

use tracing::{debug, warn};

use super::builtins::{EveOnlineFormula, LinearFormula, QuadraticFormula, SineFormula};
use super::RegenFormula;
use crate::core::error::{RegenError, Result};

/// Registry of regeneration formulas
pub struct FormulaRegistry {
    /// Sorted by `(priority, id)`
    formulas: Vec<Box<dyn RegenFormula>>,
}

impl FormulaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            formulas: Vec::new(),
        }
    }

    /// Create a registry holding the four built-in formulas
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.formulas = vec![
            Box::new(LinearFormula),
            Box::new(QuadraticFormula),
            Box::new(EveOnlineFormula),
            Box::new(SineFormula),
        ];
        registry.sort();
        registry
    }

    /// Register a formula, replacing any formula with the same id
    ///
    /// Returns the replaced formula, if there was one.
    pub fn register(
        &mut self,
        formula: Box<dyn RegenFormula>,
    ) -> Result<Option<Box<dyn RegenFormula>>> {
        if formula.id().trim().is_empty() {
            return Err(RegenError::formula(
                formula.id(),
                format!("formula '{}' has an empty id", formula.name()),
            ));
        }

        let replaced = match self.position(formula.id()) {
            Some(index) => {
                debug!("Replacing formula {} with {}", formula.id(), formula.name());
                Some(std::mem::replace(&mut self.formulas[index], formula))
            }
            None => {
                debug!("Registered formula {} ({})", formula.id(), formula.name());
                self.formulas.push(formula);
                None
            }
        };

        self.sort();
        Ok(replaced)
    }

    /// Look up a formula by id
    pub fn get(&self, id: &str) -> Option<&dyn RegenFormula> {
        self.position(id).map(|index| self.formulas[index].as_ref())
    }

    /// Look up a formula by id, failing when it is not registered
    pub fn select(&self, id: &str) -> Result<&dyn RegenFormula> {
        self.get(id)
            .ok_or_else(|| RegenError::UnknownFormula(id.to_string()))
    }

    /// The formula to use for a configured id
    ///
    /// Unknown ids fall back to the first formula in order (Linear when the
    /// built-ins are present). Returns `None` only for an empty registry.
    pub fn resolve(&self, id: &str) -> Option<&dyn RegenFormula> {
        match self.select(id) {
            Ok(formula) => Some(formula),
            Err(e) => {
                let fallback = self.formulas.first().map(|f| f.as_ref());
                if let Some(f) = fallback {
                    warn!("{}; falling back to {}", e, f.id());
                }
                fallback
            }
        }
    }

    /// Formulas in display order
    pub fn iter(&self) -> impl Iterator<Item = &dyn RegenFormula> + '_ {
        self.formulas.iter().map(|f| f.as_ref())
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<&str> {
        self.formulas.iter().map(|f| f.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.formulas.iter().position(|f| f.id() == id)
    }

    fn sort(&mut self) {
        self.formulas.sort_by(|a, b| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| a.id().cmp(b.id()))
        });
    }
}

impl Default for FormulaRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{FormulaContext, EVE_ONLINE_ID, LINEAR_ID, QUADRATIC_ID, SINE_ID};

    struct Custom {
        id: &'static str,
        priority: i32,
        rate: f64,
    }

    impl RegenFormula for Custom {
        fn name(&self) -> &str {
            "Custom"
        }
        fn id(&self) -> &str {
            self.id
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn calculate(&self, _ctx: &FormulaContext<'_>) -> Result<f64> {
            Ok(self.rate)
        }
    }

    fn custom(id: &'static str, priority: i32, rate: f64) -> Box<dyn RegenFormula> {
        Box::new(Custom { id, priority, rate })
    }

    #[test]
    fn test_builtins_in_id_order() {
        let registry = FormulaRegistry::with_builtins();
        assert_eq!(
            registry.ids(),
            vec![LINEAR_ID, QUADRATIC_ID, EVE_ONLINE_ID, SINE_ID]
        );
    }

    #[test]
    fn test_user_formula_sorts_after_builtins() {
        let mut registry = FormulaRegistry::with_builtins();
        // "00_" would sort first by id alone; priority keeps it behind
        registry.register(custom("00_Aaa", 0, 1.0)).unwrap();
        registry.register(custom("zz_Early", -5, 1.0)).unwrap();

        let ids = registry.ids();
        assert_eq!(&ids[..4], &[LINEAR_ID, QUADRATIC_ID, EVE_ONLINE_ID, SINE_ID]);
        assert_eq!(&ids[4..], &["zz_Early", "00_Aaa"]);
    }

    #[test]
    fn test_duplicate_id_replaces() {
        let mut registry = FormulaRegistry::with_builtins();
        registry.register(custom("10_Custom", 0, 1.0)).unwrap();
        let replaced = registry.register(custom("10_Custom", 0, 7.0)).unwrap();

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 5);

        let agent = crate::formula::test_support::agent(10.0, 100.0);
        let ctx = FormulaContext::new(&agent, 100.0, 1.0);
        let rate = registry.get("10_Custom").unwrap().calculate(&ctx).unwrap();
        assert_eq!(rate, 7.0);
    }

    #[test]
    fn test_builtin_can_be_replaced() {
        let mut registry = FormulaRegistry::with_builtins();
        registry.register(custom(LINEAR_ID, i32::MIN, 3.0)).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(LINEAR_ID).unwrap().name(), "Custom");
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut registry = FormulaRegistry::new();
        assert!(registry.register(custom("", 0, 1.0)).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_linear() {
        let registry = FormulaRegistry::with_builtins();
        assert_eq!(registry.resolve("42_Missing").unwrap().id(), LINEAR_ID);
        assert!(matches!(
            registry.select("42_Missing"),
            Err(RegenError::UnknownFormula(_))
        ));
    }

    #[test]
    fn test_resolve_on_empty_registry() {
        assert!(FormulaRegistry::new().resolve(LINEAR_ID).is_none());
    }
}
