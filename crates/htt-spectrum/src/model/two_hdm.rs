use std::f64::consts::{PI, SQRT_2};
use std::str::FromStr;

use htt_core::traits::CrossSectionModel;
use htt_core::{Error, Result};
use serde::{Deserialize, Serialize};

use super::{
    CpState, G_FERMI, K_RESONANT, M_TOP, below_threshold, beta, default_k_interference, to_pb,
};

/// Properties of one heavy neutral scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarState {
    /// Pole mass, GeV.
    pub mass: f64,
    /// Total width, GeV.
    pub width: f64,
    /// Coupling to top quarks as a multiple of the SM Yukawa.
    pub coupling: f64,
    /// k-factor applied to the resonant part.
    #[serde(default = "default_k_resonant")]
    pub k_res: f64,
    /// k-factor applied to the interference.
    #[serde(default = "default_k_interference")]
    pub k_int: f64,
}

fn default_k_resonant() -> f64 {
    K_RESONANT
}

impl ScalarState {
    /// State with the default naive k-factors.
    pub fn new(mass: f64, width: f64, coupling: f64) -> Self {
        Self { mass, width, coupling, k_res: K_RESONANT, k_int: default_k_interference() }
    }

    /// Override both k-factors.
    pub fn with_k_factors(mut self, k_res: f64, k_int: f64) -> Self {
        self.k_res = k_res;
        self.k_int = k_int;
        self
    }

    fn validate(&self, label: &str) -> Result<()> {
        let finite = [self.mass, self.width, self.coupling, self.k_res, self.k_int]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::Validation(format!("{label}: all parameters must be finite")));
        }
        if self.mass <= 0.0 || self.width <= 0.0 {
            return Err(Error::Validation(format!(
                "{label}: mass and width must be > 0, got mass={}, width={}",
                self.mass, self.width
            )));
        }
        Ok(())
    }

    fn breit_wigner_denom(&self, s: f64) -> f64 {
        let d = s - self.mass * self.mass;
        d * d + (self.mass * self.width).powi(2)
    }
}

/// One of the four additive pieces of the 2HDM cross section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Resonant gg -> A -> tt.
    ARes,
    /// Interference of gg -> A -> tt with SM tt.
    AInt,
    /// Resonant gg -> H -> tt.
    HRes,
    /// Interference of gg -> H -> tt with SM tt.
    HInt,
}

impl Component {
    /// All components in a fixed order.
    pub const ALL: [Component; 4] =
        [Component::ARes, Component::AInt, Component::HRes, Component::HInt];

    fn index(self) -> usize {
        match self {
            Component::ARes => 0,
            Component::AInt => 1,
            Component::HRes => 2,
            Component::HInt => 3,
        }
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ARes" => Ok(Component::ARes),
            "AInt" => Ok(Component::AInt),
            "HRes" => Ok(Component::HRes),
            "HInt" => Ok(Component::HInt),
            other => Err(Error::Validation(format!("Do not recognize component \"{other}\""))),
        }
    }
}

/// Set of enabled cross-section components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSet([bool; 4]);

impl ComponentSet {
    /// Every component enabled.
    pub fn all() -> Self {
        Self([true; 4])
    }

    /// Nothing enabled.
    pub fn none() -> Self {
        Self([false; 4])
    }

    /// Parse a set from labels such as `"ARes"` or `"HInt"`.
    pub fn from_labels<'a, I>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = Self::none();
        for label in labels {
            set = set.with(label.parse()?);
        }
        Ok(set)
    }

    /// Copy of the set with `component` enabled.
    pub fn with(mut self, component: Component) -> Self {
        self.0[component.index()] = true;
        self
    }

    /// Whether `component` is enabled.
    pub fn contains(&self, component: Component) -> bool {
        self.0[component.index()]
    }
}

impl Default for ComponentSet {
    fn default() -> Self {
        Self::all()
    }
}

/// gg -> A/H -> tt in a two-Higgs-doublet model.
///
/// Either state may be absent, which turns the model into a simplified model
/// with a single scalar. The same formulas serve the hMSSM once the dependent
/// parameters (masses, widths, couplings) have been looked up by the caller.
#[derive(Debug, Clone)]
pub struct TwoHdmModel {
    a: Option<ScalarState>,
    h: Option<ScalarState>,
    components: ComponentSet,
    variation_scale: f64,
}

impl TwoHdmModel {
    /// Model with both a CP-odd and a CP-even state.
    pub fn new(a: ScalarState, h: ScalarState) -> Result<Self> {
        Self::from_states(Some(a), Some(h))
    }

    /// Simplified model with a single scalar of the given CP state.
    pub fn single(cp: CpState, state: ScalarState) -> Result<Self> {
        match cp {
            CpState::Odd => Self::from_states(Some(state), None),
            CpState::Even => Self::from_states(None, Some(state)),
        }
    }

    fn from_states(a: Option<ScalarState>, h: Option<ScalarState>) -> Result<Self> {
        if let Some(a) = &a {
            a.validate("A")?;
        }
        if let Some(h) = &h {
            h.validate("H")?;
        }
        let variation_scale = a
            .iter()
            .chain(h.iter())
            .map(|st| st.width)
            .fold(f64::INFINITY, f64::min);
        if !variation_scale.is_finite() {
            return Err(Error::Validation("TwoHdmModel needs at least one scalar state".into()));
        }
        Ok(Self { a, h, components: ComponentSet::all(), variation_scale })
    }

    /// Restrict evaluation to a subset of components.
    pub fn with_components(mut self, components: ComponentSet) -> Self {
        self.components = components;
        self
    }

    /// Currently enabled components.
    pub fn components(&self) -> ComponentSet {
        self.components
    }

    /// CP-odd state, if present.
    pub fn a(&self) -> Option<&ScalarState> {
        self.a.as_ref()
    }

    /// CP-even state, if present.
    pub fn h(&self) -> Option<&ScalarState> {
        self.h.as_ref()
    }

    /// Evaluate one component, in pb, regardless of the enabled set.
    pub fn component(&self, component: Component, s: f64, alpha_s: f64) -> f64 {
        if below_threshold(s) {
            return 0.0;
        }
        match component {
            Component::ARes => self.a.map_or(0.0, |st| odd_res(&st, s, alpha_s)),
            Component::AInt => self.a.map_or(0.0, |st| odd_int(&st, s, alpha_s)),
            Component::HRes => self.h.map_or(0.0, |st| even_res(&st, s, alpha_s)),
            Component::HInt => self.h.map_or(0.0, |st| even_int(&st, s, alpha_s)),
        }
    }

    fn sum_enabled(&self, parts: [Component; 2], s: f64, alpha_s: f64) -> f64 {
        parts
            .iter()
            .filter(|c| self.components.contains(**c))
            .map(|&c| self.component(c, s, alpha_s))
            .sum()
    }
}

fn log_ratio(b: f64) -> f64 {
    ((1.0 + b) / (1.0 - b)).ln()
}

fn even_res(st: &ScalarState, s: f64, alpha_s: f64) -> f64 {
    let b = beta(s);
    let y = log_ratio(b);
    let a = 3.0 * (alpha_s * G_FERMI * M_TOP.powi(3)).powi(2) * b.powi(3) / (1024.0 * PI.powi(3));
    let bb = 16.0
        + 8.0 * b * b * (PI * PI - y * y)
        + b.powi(4) * (PI * PI + y * y).powi(2);
    to_pb(st.k_res * st.coupling.powi(4) * a * bb / st.breit_wigner_denom(s))
}

fn even_int(st: &ScalarState, s: f64, alpha_s: f64) -> f64 {
    let b = beta(s);
    let y = log_ratio(b);
    let a = -alpha_s * alpha_s * G_FERMI * M_TOP.powi(4) * b * b / (32.0 * PI * SQRT_2 * s) * y;
    let bb = (s - st.mass * st.mass) * (4.0 + b * b * (PI * PI - y * y))
        + 2.0 * PI * b * b * st.mass * st.width * y;
    to_pb(st.k_int * st.coupling.powi(2) * a * bb / st.breit_wigner_denom(s))
}

fn odd_res(st: &ScalarState, s: f64, alpha_s: f64) -> f64 {
    let b = beta(s);
    let y = log_ratio(b);
    let a = 3.0 * (alpha_s * G_FERMI * M_TOP.powi(3)).powi(2) * b / (1024.0 * PI.powi(3));
    let bb = (PI * PI + y * y).powi(2);
    to_pb(st.k_res * st.coupling.powi(4) * a * bb / st.breit_wigner_denom(s))
}

fn odd_int(st: &ScalarState, s: f64, alpha_s: f64) -> f64 {
    let b = beta(s);
    let y = log_ratio(b);
    let a = -alpha_s * alpha_s * G_FERMI * M_TOP.powi(4) / (32.0 * PI * SQRT_2 * s) * y;
    let bb = (s - st.mass * st.mass) * (PI * PI - y * y) + 2.0 * PI * st.mass * st.width * y;
    to_pb(st.k_int * st.coupling.powi(2) * a * bb / st.breit_wigner_denom(s))
}

impl CrossSectionModel for TwoHdmModel {
    fn resonant(&self, s: f64, alpha_s: f64) -> Result<f64> {
        Ok(self.sum_enabled([Component::ARes, Component::HRes], s, alpha_s))
    }

    fn interference(&self, s: f64, alpha_s: f64) -> Result<f64> {
        Ok(self.sum_enabled([Component::AInt, Component::HInt], s, alpha_s))
    }

    fn variation_scale(&self) -> Result<f64> {
        Ok(self.variation_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::loops::fermion_loop;
    use approx::assert_relative_eq;

    fn benchmark() -> TwoHdmModel {
        TwoHdmModel::new(ScalarState::new(500.0, 20.0, 1.0), ScalarState::new(550.0, 25.0, 1.0))
            .unwrap()
    }

    #[test]
    fn test_variation_scale_is_narrower_width() {
        assert_eq!(benchmark().variation_scale().unwrap(), 20.0);
    }

    #[test]
    fn test_resonant_peaks_near_mass() {
        let m = TwoHdmModel::single(CpState::Odd, ScalarState::new(500.0, 10.0, 1.0)).unwrap();
        let on_peak = m.resonant(500.0 * 500.0, 0.1).unwrap();
        let off_peak = m.resonant(600.0 * 600.0, 0.1).unwrap();
        assert!(on_peak > 10.0 * off_peak);
        assert!(on_peak > 0.0);
    }

    #[test]
    fn test_interference_changes_sign_across_pole() {
        let m = TwoHdmModel::single(CpState::Odd, ScalarState::new(600.0, 5.0, 1.0)).unwrap();
        let below = m.interference(560.0 * 560.0, 0.1).unwrap();
        let above = m.interference(640.0 * 640.0, 0.1).unwrap();
        assert!(below * above < 0.0, "below={below}, above={above}");
    }

    #[test]
    fn test_component_selection() {
        let full = benchmark();
        let only_a = benchmark().with_components(ComponentSet::from_labels(["ARes", "AInt"]).unwrap());
        let s = 520.0 * 520.0;
        let expected = full.component(Component::ARes, s, 0.1) + full.component(Component::AInt, s, 0.1);
        assert_relative_eq!(only_a.total(s, 0.1).unwrap(), expected, epsilon = 1e-15);
        assert!(ComponentSet::from_labels(["Bkg"]).is_err());
    }

    #[test]
    fn test_odd_resonant_matches_loop_form() {
        // 2 a s^2 β |A_A|^2 / D with a = 3 (αs G_F m_t)^2 / (8192 π^3).
        let st = ScalarState::new(500.0, 20.0, 1.0);
        let m = TwoHdmModel::single(CpState::Odd, st).unwrap();
        let s: f64 = 520.0 * 520.0;
        let alpha_s = 0.1;
        let ampl = fermion_loop(CpState::Odd, s, M_TOP);
        let a = 3.0 * (alpha_s * G_FERMI * M_TOP).powi(2) / (8192.0 * PI.powi(3));
        let loop_form =
            to_pb(st.k_res * 2.0 * a * s * s * beta(s) * ampl.norm_sqr() / st.breit_wigner_denom(s));
        assert_relative_eq!(m.resonant(s, alpha_s).unwrap(), loop_form, max_relative = 1e-10);
    }

    #[test]
    fn test_rejects_invalid_states() {
        assert!(TwoHdmModel::single(CpState::Even, ScalarState::new(500.0, 0.0, 1.0)).is_err());
        assert!(TwoHdmModel::from_states(None, None).is_err());
    }
}
