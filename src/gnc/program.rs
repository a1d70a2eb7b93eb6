use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;

/// One step of a guidance program: `setting` holds from `altitude` up to the
/// next breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub altitude: f64,
    pub setting: f64,
}

/// Altitude-indexed, piecewise-constant control schedule.
///
/// Breakpoints are strictly ascending in altitude and there is at least
/// one. A program is never changed in place; derived programs are built with
/// [`Program::with_setting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct Program {
    breakpoints: Vec<Breakpoint>,
}

impl Program {
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, ProgramError> {
        if breakpoints.is_empty() {
            return Err(ProgramError::Empty);
        }
        if let Some(index) = breakpoints
            .windows(2)
            .position(|w| !(w[1].altitude > w[0].altitude))
        {
            return Err(ProgramError::NotAscending { index: index + 1 });
        }
        Ok(Self { breakpoints })
    }

    /// Build from `(altitude, setting)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, ProgramError> {
        Self::new(
            pairs
                .iter()
                .map(|&(altitude, setting)| Breakpoint { altitude, setting })
                .collect(),
        )
    }

    /// A single breakpoint holding `setting` from `floor` upward.
    pub fn constant(floor: f64, setting: f64) -> Self {
        Self {
            breakpoints: vec![Breakpoint { altitude: floor, setting }],
        }
    }

    /// Setting of the highest breakpoint at or below `altitude`.
    pub fn lookup(&self, altitude: f64) -> Result<f64, ProgramError> {
        let floor = self.floor();
        if altitude < floor {
            return Err(ProgramError::BelowRange { altitude, floor });
        }
        let index = self
            .breakpoints
            .iter()
            .skip(1)
            .take_while(|b| !(altitude < b.altitude))
            .count();
        Ok(self.breakpoints[index].setting)
    }

    /// Lowest altitude the program is defined for.
    pub fn floor(&self) -> f64 {
        self.breakpoints[0].altitude
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Copy of this program with breakpoint `index` set to `setting`.
    ///
    /// Panics if `index` is out of range.
    pub fn with_setting(&self, index: usize, setting: f64) -> Program {
        let mut breakpoints = self.breakpoints.clone();
        breakpoints[index].setting = setting;
        Program { breakpoints }
    }

    /// Display adaptor that multiplies every setting by `factor`
    /// (e.g. radians to degrees).
    pub fn display_scaled(&self, factor: f64) -> Scaled<'_> {
        Scaled { program: self, factor }
    }
}

impl TryFrom<Vec<Breakpoint>> for Program {
    type Error = ProgramError;

    fn try_from(breakpoints: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        Program::new(breakpoints)
    }
}

impl From<Program> for Vec<Breakpoint> {
    fn from(program: Program) -> Self {
        program.breakpoints
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_scaled(1.0), f)
    }
}

pub struct Scaled<'a> {
    program: &'a Program,
    factor: f64,
}

impl fmt::Display for Scaled<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.program.breakpoints.iter().enumerate() {
            writeln!(f, "  [{:>2}] {:>8.0} m -> {:.3}", i, b.altitude, b.setting * self.factor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staircase() -> Program {
        Program::from_pairs(&[(0.0, 1.0), (1_000.0, 0.5), (10_000.0, 0.25)]).unwrap()
    }

    #[test]
    fn lookup_holds_between_breakpoints() {
        let p = staircase();
        assert_eq!(p.lookup(0.0).unwrap(), 1.0);
        assert_eq!(p.lookup(999.9).unwrap(), 1.0);
        assert_eq!(p.lookup(1_000.0).unwrap(), 0.5);
        assert_eq!(p.lookup(5_000.0).unwrap(), 0.5);
        assert_eq!(p.lookup(10_000.0).unwrap(), 0.25);
        assert_eq!(p.lookup(1.0e9).unwrap(), 0.25);
    }

    #[test]
    fn below_floor_is_an_error() {
        let p = staircase();
        assert_eq!(
            p.lookup(-0.5),
            Err(ProgramError::BelowRange { altitude: -0.5, floor: 0.0 })
        );
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(Program::new(vec![]), Err(ProgramError::Empty));
        assert_eq!(
            Program::from_pairs(&[(0.0, 1.0), (5.0, 1.0), (5.0, 0.0)]),
            Err(ProgramError::NotAscending { index: 2 })
        );
    }

    #[test]
    fn with_setting_leaves_original_untouched() {
        let p = staircase();
        let q = p.with_setting(1, 0.0);
        assert_eq!(p.lookup(2_000.0).unwrap(), 0.5);
        assert_eq!(q.lookup(2_000.0).unwrap(), 0.0);
        assert_eq!(q.len(), p.len());
    }

    #[test]
    fn display_lists_breakpoints() {
        let text = staircase().display_scaled(2.0).to_string();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("-> 2.000"));
        assert!(text.contains("-> 0.500"));
    }

    #[test]
    fn serde_validates() {
        let json = serde_json::to_string(&staircase()).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, staircase());
        assert!(serde_json::from_str::<Program>("[]").is_err());
    }
}
