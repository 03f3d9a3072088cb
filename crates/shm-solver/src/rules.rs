//! The identity battery used by the fixed-point solver.
//!
//! Each [`Rule`] derives one target quantity from quantities already in the
//! state. Rules are listed in precedence order: when several formulas could
//! produce the same target, the first one whose inputs are available wins.
//! A formula yields `None` when an input is missing, a divisor is zero, a
//! radicand is negative or the result is not finite.

use core::f64::consts::TAU;
use shm_core::{Family, Quantity as Q, Real, State, checked_div, checked_sqrt};

/// One derivation formula.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Formula as shown in derivation traces.
    pub name: &'static str,
    pub target: Q,
    /// Restricts the rule to one family; `None` applies to both.
    pub family: Option<Family>,
    derive: fn(&State) -> Option<Real>,
}

impl Rule {
    pub fn applies_to(&self, family: Family) -> bool {
        self.family.is_none_or(|f| f == family)
    }

    /// Evaluate the formula against `state`, ignoring whether the target is
    /// already set.
    pub fn derive(&self, state: &State) -> Option<Real> {
        (self.derive)(state).filter(|v| v.is_finite())
    }
}

impl core::fmt::Debug for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("family", &self.family)
            .finish()
    }
}

const fn rule(name: &'static str, target: Q, derive: fn(&State) -> Option<Real>) -> Rule {
    Rule {
        name,
        target,
        family: None,
        derive,
    }
}

const fn only(
    family: Family,
    name: &'static str,
    target: Q,
    derive: fn(&State) -> Option<Real>,
) -> Rule {
    Rule {
        name,
        target,
        family: Some(family),
        derive,
    }
}

pub static RULES: [Rule; 30] = [
    // angular frequency
    rule("omega = 2π/T", Q::Omega, omega_from_period),
    rule("omega = 2π·f", Q::Omega, omega_from_frequency),
    only(Family::Spring, "omega = √(k/m)", Q::Omega, omega_from_spring),
    only(Family::Pendulum, "omega = √(g/L)", Q::Omega, omega_from_pendulum),
    // period and frequency
    rule("T = 2π/omega", Q::Period, period_from_omega),
    rule("T = 1/f", Q::Period, period_from_frequency),
    rule("f = omega/2π", Q::Frequency, frequency_from_omega),
    rule("f = 1/T", Q::Frequency, frequency_from_period),
    // net force
    only(Family::Spring, "sigmaF = k·x", Q::NetForce, force_from_spring),
    rule("sigmaF = m·g", Q::NetForce, force_from_weight),
    // spring parameters
    only(Family::Spring, "k = m·omega²", Q::Stiffness, stiffness_from_omega),
    only(Family::Spring, "m = k/omega²", Q::Mass, mass_from_omega),
    // amplitude
    rule("A = √((v/omega)² + x²)", Q::Amplitude, amplitude_from_phase),
    rule("A = Vmax/omega", Q::Amplitude, amplitude_from_vmax),
    rule("A = a_max/omega²", Q::Amplitude, amplitude_from_amax),
    rule("A = √(2E/k)", Q::Amplitude, amplitude_from_energy_k),
    rule("A = √(2E/(m·omega²))", Q::Amplitude, amplitude_from_energy_m),
    // instantaneous speed
    rule("v = omega·√(A² − x²)", Q::Velocity, velocity_from_amplitude),
    rule("v = √(2·KE/m)", Q::Velocity, velocity_from_kinetic),
    rule("v = √(2·(E − PE)/m)", Q::Velocity, velocity_from_energy),
    // peaks and instantaneous acceleration
    rule("Vmax = omega·A", Q::MaxVelocity, vmax_from_amplitude),
    rule("a_max = omega²·A", Q::MaxAccel, amax_from_amplitude),
    rule("a = −omega²·x", Q::Accel, accel_from_displacement),
    // energies
    rule("PE = ½·k·x²", Q::Potential, potential_from_spring),
    rule("E = ½·k·A²", Q::Energy, energy_from_amplitude),
    rule("E = ½·m·Vmax²", Q::Energy, energy_from_vmax),
    rule("E = KE + PE", Q::Energy, energy_from_parts),
    rule("KE = ½·m·v²", Q::Kinetic, kinetic_from_velocity),
    rule("KE = E − PE", Q::Kinetic, kinetic_from_energy),
    rule("PE = E − KE", Q::Potential, potential_from_energy),
];

/// All rules applicable to `family`, in precedence order.
pub fn battery(family: Family) -> impl Iterator<Item = &'static Rule> {
    RULES.iter().filter(move |r| r.applies_to(family))
}

fn omega_from_period(s: &State) -> Option<Real> {
    checked_div(TAU, s.get(Q::Period)?)
}

fn omega_from_frequency(s: &State) -> Option<Real> {
    Some(TAU * s.get(Q::Frequency)?)
}

fn omega_from_spring(s: &State) -> Option<Real> {
    checked_sqrt(checked_div(s.get(Q::Stiffness)?, s.get(Q::Mass)?)?)
}

fn omega_from_pendulum(s: &State) -> Option<Real> {
    checked_sqrt(checked_div(s.get(Q::Gravity)?, s.get(Q::Length)?)?)
}

fn period_from_omega(s: &State) -> Option<Real> {
    checked_div(TAU, s.get(Q::Omega)?)
}

fn period_from_frequency(s: &State) -> Option<Real> {
    checked_div(1.0, s.get(Q::Frequency)?)
}

fn frequency_from_omega(s: &State) -> Option<Real> {
    Some(s.get(Q::Omega)? / TAU)
}

fn frequency_from_period(s: &State) -> Option<Real> {
    checked_div(1.0, s.get(Q::Period)?)
}

// A zero spring constant is treated as "no spring", not as zero force.
fn force_from_spring(s: &State) -> Option<Real> {
    let k = s.get(Q::Stiffness).filter(|k| *k != 0.0)?;
    Some(k * s.get(Q::Displacement)?)
}

fn force_from_weight(s: &State) -> Option<Real> {
    Some(s.get(Q::Mass)? * s.get(Q::Gravity)?)
}

fn stiffness_from_omega(s: &State) -> Option<Real> {
    Some(s.get(Q::Mass)? * s.get(Q::Omega)?.powi(2))
}

fn mass_from_omega(s: &State) -> Option<Real> {
    checked_div(s.get(Q::Stiffness)?, s.get(Q::Omega)?.powi(2))
}

fn amplitude_from_phase(s: &State) -> Option<Real> {
    let ratio = checked_div(s.get(Q::Velocity)?, s.get(Q::Omega)?)?;
    checked_sqrt(ratio.powi(2) + s.get(Q::Displacement)?.powi(2))
}

fn amplitude_from_vmax(s: &State) -> Option<Real> {
    checked_div(s.get(Q::MaxVelocity)?, s.get(Q::Omega)?)
}

fn amplitude_from_amax(s: &State) -> Option<Real> {
    checked_div(s.get(Q::MaxAccel)?, s.get(Q::Omega)?.powi(2))
}

fn amplitude_from_energy_k(s: &State) -> Option<Real> {
    checked_sqrt(checked_div(2.0 * s.get(Q::Energy)?, s.get(Q::Stiffness)?)?)
}

fn amplitude_from_energy_m(s: &State) -> Option<Real> {
    let denom = s.get(Q::Mass)? * s.get(Q::Omega)?.powi(2);
    checked_sqrt(checked_div(2.0 * s.get(Q::Energy)?, denom)?)
}

fn velocity_from_amplitude(s: &State) -> Option<Real> {
    let radicand = s.get(Q::Amplitude)?.powi(2) - s.get(Q::Displacement)?.powi(2);
    Some(s.get(Q::Omega)? * checked_sqrt(radicand)?)
}

fn velocity_from_kinetic(s: &State) -> Option<Real> {
    checked_sqrt(checked_div(2.0 * s.get(Q::Kinetic)?, s.get(Q::Mass)?)?)
}

fn velocity_from_energy(s: &State) -> Option<Real> {
    let kinetic = s.get(Q::Energy)? - s.get(Q::Potential)?;
    checked_sqrt(checked_div(2.0 * kinetic, s.get(Q::Mass)?)?)
}

fn vmax_from_amplitude(s: &State) -> Option<Real> {
    Some(s.get(Q::Omega)? * s.get(Q::Amplitude)?)
}

fn amax_from_amplitude(s: &State) -> Option<Real> {
    Some(s.get(Q::Omega)?.powi(2) * s.get(Q::Amplitude)?)
}

fn accel_from_displacement(s: &State) -> Option<Real> {
    Some(-s.get(Q::Omega)?.powi(2) * s.get(Q::Displacement)?)
}

/// Spring energies are only defined for a restoring spring.
fn positive_stiffness(s: &State) -> Option<Real> {
    s.get(Q::Stiffness).filter(|k| *k > 0.0)
}

fn potential_from_spring(s: &State) -> Option<Real> {
    Some(0.5 * positive_stiffness(s)? * s.get(Q::Displacement)?.powi(2))
}

fn energy_from_amplitude(s: &State) -> Option<Real> {
    Some(0.5 * positive_stiffness(s)? * s.get(Q::Amplitude)?.powi(2))
}

fn energy_from_vmax(s: &State) -> Option<Real> {
    Some(0.5 * s.get(Q::Mass)? * s.get(Q::MaxVelocity)?.powi(2))
}

fn energy_from_parts(s: &State) -> Option<Real> {
    Some(s.get(Q::Kinetic)? + s.get(Q::Potential)?)
}

fn kinetic_from_velocity(s: &State) -> Option<Real> {
    Some(0.5 * s.get(Q::Mass)? * s.get(Q::Velocity)?.powi(2))
}

fn kinetic_from_energy(s: &State) -> Option<Real> {
    Some(s.get(Q::Energy)? - s.get(Q::Potential)?)
}

fn potential_from_energy(s: &State) -> Option<Real> {
    Some(s.get(Q::Energy)? - s.get(Q::Kinetic)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(name: &str) -> &'static Rule {
        battery(Family::Spring)
            .chain(battery(Family::Pendulum))
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    #[test]
    fn family_filter() {
        assert!(battery(Family::Pendulum).all(|r| r.target != Q::Stiffness));
        assert!(battery(Family::Spring).any(|r| r.name == "omega = √(k/m)"));
        assert!(!battery(Family::Spring).any(|r| r.name == "omega = √(g/L)"));
    }

    #[test]
    fn period_guards_zero_divisor() {
        let rule = find("omega = 2π/T");
        assert_eq!(rule.derive(&State::new().with(Q::Period, 0.0)), None);
        let omega = rule.derive(&State::new().with(Q::Period, 2.5)).unwrap();
        assert!((omega - 2.513274).abs() < 1e-6);
    }

    #[test]
    fn zero_stiffness_gives_no_spring_force() {
        let rule = find("sigmaF = k·x");
        let s = State::new().with(Q::Stiffness, 0.0).with(Q::Displacement, 5.0);
        assert_eq!(rule.derive(&s), None);
        let s = State::new().with(Q::Stiffness, 20.0).with(Q::Displacement, 0.5);
        assert_eq!(rule.derive(&s), Some(10.0));
    }

    #[test]
    fn spring_energies_need_positive_stiffness() {
        let pe = find("PE = ½·k·x²");
        let e = find("E = ½·k·A²");
        for k in [0.0, -4.0] {
            let s = State::new()
                .with(Q::Stiffness, k)
                .with(Q::Displacement, 0.5)
                .with(Q::Amplitude, 1.0);
            assert_eq!(pe.derive(&s), None, "k = {k}");
            assert_eq!(e.derive(&s), None, "k = {k}");
        }

        let s = State::new()
            .with(Q::Stiffness, 4.0)
            .with(Q::Displacement, 0.5)
            .with(Q::Amplitude, 1.0);
        assert_eq!(pe.derive(&s), Some(0.5));
        assert_eq!(e.derive(&s), Some(2.0));
    }

    #[test]
    fn negative_radicand_yields_no_value() {
        let rule = find("v = omega·√(A² − x²)");
        let s = State::new()
            .with(Q::Omega, 2.0)
            .with(Q::Amplitude, 0.1)
            .with(Q::Displacement, 0.2);
        assert_eq!(rule.derive(&s), None);

        let at_turning_point = State::new()
            .with(Q::Omega, 2.0)
            .with(Q::Amplitude, 0.1)
            .with(Q::Displacement, 0.1);
        assert_eq!(rule.derive(&at_turning_point), Some(0.0));

        let rule = find("v = √(2·(E − PE)/m)");
        let s = State::new()
            .with(Q::Energy, 1.0)
            .with(Q::Potential, 2.0)
            .with(Q::Mass, 1.0);
        assert_eq!(rule.derive(&s), None);
    }

    #[test]
    fn amplitude_from_phase_point() {
        let rule = find("A = √((v/omega)² + x²)");
        let s = State::new()
            .with(Q::Velocity, 0.4)
            .with(Q::Omega, 1.0)
            .with(Q::Displacement, 0.3);
        assert!((rule.derive(&s).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn restoring_acceleration_opposes_displacement() {
        let rule = find("a = −omega²·x");
        let s = State::new().with(Q::Omega, 3.0).with(Q::Displacement, 0.1);
        assert!((rule.derive(&s).unwrap() + 0.9).abs() < 1e-12);
    }

    #[test]
    fn missing_input_yields_none() {
        for rule in battery(Family::Spring).chain(battery(Family::Pendulum)) {
            assert_eq!(rule.derive(&State::new()), None, "{}", rule.name);
        }
    }
}
