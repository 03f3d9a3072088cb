// shm-core/src/units.rs

use crate::quantity::Quantity;
use crate::numeric::{Real, format_sig};

pub mod constants {
    /// Gravity applied to pendulum states that do not supply `g`.
    pub const STANDARD_GRAVITY_MPS2: f64 = 9.81;
}

/// SI unit symbol for a quantity.
///
/// uom has no spring-constant quantity, so `k` is spelled out as N/m.
pub fn unit_symbol(q: Quantity) -> &'static str {
    use uom::si::Unit;
    use uom::si::{
        acceleration::meter_per_second_squared, angular_velocity::radian_per_second,
        energy::joule, force::newton, frequency::hertz, length::meter, mass::kilogram,
        time::second, velocity::meter_per_second,
    };

    match q {
        Quantity::Mass => kilogram::abbreviation(),
        Quantity::Stiffness => "N/m",
        Quantity::Length | Quantity::Displacement | Quantity::Amplitude => meter::abbreviation(),
        Quantity::Gravity | Quantity::MaxAccel | Quantity::Accel => {
            meter_per_second_squared::abbreviation()
        }
        Quantity::NetForce => newton::abbreviation(),
        Quantity::Velocity | Quantity::MaxVelocity => meter_per_second::abbreviation(),
        Quantity::Kinetic | Quantity::Potential | Quantity::Energy => joule::abbreviation(),
        Quantity::Omega => radian_per_second::abbreviation(),
        Quantity::Frequency => hertz::abbreviation(),
        Quantity::Period => second::abbreviation(),
    }
}

/// `value` rendered with six significant digits and its unit symbol.
pub fn with_unit(q: Quantity, value: Real) -> String {
    format!("{} {}", format_sig(value, 6), unit_symbol(q))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_symbols() {
        assert_eq!(unit_symbol(Quantity::Mass), "kg");
        assert_eq!(unit_symbol(Quantity::Period), "s");
        assert_eq!(unit_symbol(Quantity::Stiffness), "N/m");
        assert_eq!(unit_symbol(Quantity::Omega), "rad/s");
        assert_eq!(with_unit(Quantity::NetForce, 19.62), "19.62 N");
    }
}
