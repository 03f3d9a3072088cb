//! Fixed explanatory text per oscillator family.

use shm_core::Family;

const SPRING: &str = "\
Mass-spring oscillator
- omega = sqrt(k/m)
- T = 2*pi*sqrt(m/k)
- f = 1/T = omega/(2*pi)
- sigmaF = k*x (or m*g for a hanging mass at equilibrium)
- x(t) = A*cos(omega*t + phi)
- v = omega*sqrt(A^2 - x^2)
- a = -omega^2 * x
- Vmax = omega*A, a_max = omega^2 * A
- KE = m*v^2/2, PE = k*x^2/2, E = k*A^2/2
";

const PENDULUM: &str = "\
Simple pendulum (small angle)
- omega = sqrt(g/L)
- T = 2*pi*sqrt(L/g)
- f = 1/T
- x is the arc displacement, x(t) = A*sin(omega*t + phi)
- v = omega*sqrt(A^2 - x^2), a = -omega^2 * x
- g defaults to 9.81 m/s^2 when not given
";

pub fn explanation(family: Family) -> &'static str {
    match family {
        Family::Spring => SPRING,
        Family::Pendulum => PENDULUM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texts_differ_by_family() {
        assert!(explanation(Family::Spring).contains("sqrt(k/m)"));
        assert!(explanation(Family::Pendulum).contains("sqrt(g/L)"));
    }
}
