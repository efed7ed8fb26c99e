//! # Memory Register
//!
//! A single scratch value with a presence flag, independent of the display.
//! The flag drives the `M` indicator and gates recall.

use serde::{Deserialize, Serialize};

use crate::errors::{check_finite, CalcResult};

/// Memory register (MC / MR / MS / M+ / M-).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryRegister {
    value: f64,
    present: bool,
}

impl MemoryRegister {
    /// Empty register
    pub fn new() -> Self {
        Self::default()
    }

    /// MC: zero the register and drop the flag.
    pub fn clear(&mut self) {
        self.value = 0.0;
        self.present = false;
    }

    /// MS: overwrite the register.
    pub fn store(&mut self, value: f64) {
        self.value = value;
        self.present = true;
    }

    /// M+: accumulate into the register.
    ///
    /// On overflow the register is left unchanged.
    pub fn add(&mut self, value: f64) -> CalcResult<()> {
        self.accumulate("memory add", self.value + value)
    }

    /// M-: subtract from the register.
    ///
    /// On overflow the register is left unchanged.
    pub fn subtract(&mut self, value: f64) -> CalcResult<()> {
        self.accumulate("memory subtract", self.value - value)
    }

    fn accumulate(&mut self, operation: &str, next: f64) -> CalcResult<()> {
        self.value = check_finite(operation, next)?;
        self.present = true;
        Ok(())
    }

    /// MR: the stored value, or `None` when nothing has been stored.
    pub fn recall(&self) -> Option<f64> {
        self.present.then_some(self.value)
    }

    /// Raw register value (0 when empty)
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn has_value(&self) -> bool {
        self.present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_register_recalls_nothing() {
        let memory = MemoryRegister::new();
        assert!(!memory.has_value());
        assert_eq!(memory.recall(), None);
    }

    #[test]
    fn test_store_and_recall() {
        let mut memory = MemoryRegister::new();
        memory.store(5.0);
        assert_eq!(memory.recall(), Some(5.0));
        memory.store(2.0);
        assert_eq!(memory.recall(), Some(2.0));
    }

    #[test]
    fn test_accumulate() {
        let mut memory = MemoryRegister::new();
        memory.add(10.0).unwrap();
        memory.subtract(3.5).unwrap();
        assert!(memory.has_value());
        assert_eq!(memory.value(), 6.5);
    }

    #[test]
    fn test_clear_resets_flag() {
        let mut memory = MemoryRegister::new();
        memory.store(42.0);
        memory.clear();
        assert_eq!(memory.value(), 0.0);
        assert_eq!(memory.recall(), None);
    }

    #[test]
    fn test_subtract_from_empty_sets_flag() {
        let mut memory = MemoryRegister::new();
        memory.subtract(4.0).unwrap();
        assert_eq!(memory.recall(), Some(-4.0));
    }

    #[test]
    fn test_overflow_leaves_register_unchanged() {
        let mut memory = MemoryRegister::new();
        memory.store(f64::MAX);
        let err = memory.add(f64::MAX).unwrap_err();
        assert_eq!(err.error_code(), "OVERFLOW");
        assert_eq!(memory.recall(), Some(f64::MAX));
    }
}
