//! Two-master scalar values.
//!
//! Every coordinate in a contour carries its value at both ends of the
//! weight axis. All arithmetic happens on projected plain numbers, one
//! master at a time; results are re-wrapped with [`TwoMasterValue::make`].

use std::fmt;

/// One extreme of the weight axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Master {
    Light,
    Heavy,
}

impl Master {
    /// Both masters, light first.
    pub const BOTH: [Master; 2] = [Master::Light, Master::Heavy];
}

impl fmt::Display for Master {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Master::Light => write!(f, "light"),
            Master::Heavy => write!(f, "heavy"),
        }
    }
}

/// A scalar holding its light value and its light-to-heavy delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoMasterValue {
    origin: f64,
    delta: f64,
}

impl TwoMasterValue {
    /// Build a value from its light and heavy instances.
    pub fn make(light: f64, heavy: f64) -> Self {
        Self {
            origin: light,
            delta: heavy - light,
        }
    }

    pub fn light(&self) -> f64 {
        self.origin
    }

    pub fn heavy(&self) -> f64 {
        self.origin + self.delta
    }

    /// Project out one master.
    pub fn at(&self, master: Master) -> f64 {
        match master {
            Master::Light => self.light(),
            Master::Heavy => self.heavy(),
        }
    }

    /// Build a value by evaluating `f` once per master.
    pub fn from_fn(mut f: impl FnMut(Master) -> f64) -> Self {
        let light = f(Master::Light);
        let heavy = f(Master::Heavy);
        Self::make(light, heavy)
    }
}

impl fmt::Display for TwoMasterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.light(), self.heavy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_both_masters() {
        let v = TwoMasterValue::make(10.0, 42.5);
        assert_eq!(v.light(), 10.0);
        assert_eq!(v.heavy(), 42.5);
        assert_eq!(v.at(Master::Light), 10.0);
        assert_eq!(v.at(Master::Heavy), 42.5);
    }

    #[test]
    fn from_fn_evaluates_light_then_heavy() {
        let mut seen = Vec::new();
        let v = TwoMasterValue::from_fn(|m| {
            seen.push(m);
            match m {
                Master::Light => 1.0,
                Master::Heavy => 2.0,
            }
        });
        assert_eq!(seen, vec![Master::Light, Master::Heavy]);
        assert_eq!((v.light(), v.heavy()), (1.0, 2.0));
    }
}
