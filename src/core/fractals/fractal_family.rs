use crate::core::data::complex::Complex;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FractalFamily {
    #[default]
    Mandelbrot,
    Julia,
    BurningShip,
    Tricorn,
    Newton,
}

impl FractalFamily {
    pub const ALL: &'static [Self] = &[
        Self::Mandelbrot,
        Self::Julia,
        Self::BurningShip,
        Self::Tricorn,
        Self::Newton,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
            Self::BurningShip => "Burning Ship",
            Self::Tricorn => "Tricorn",
            Self::Newton => "Newton",
        }
    }

    /// Center used when the family is selected.
    #[must_use]
    pub const fn seed_center(self) -> Complex {
        match self {
            Self::Mandelbrot => Complex::new(-0.5, 0.0),
            Self::BurningShip => Complex::new(-0.5, -0.5),
            Self::Julia | Self::Tricorn | Self::Newton => Complex::ZERO,
        }
    }
}

impl fmt::Display for FractalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFractalFamilyError {
    input: String,
}

impl fmt::Display for ParseFractalFamilyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown fractal family '{}' (expected mandelbrot, julia, burning-ship, tricorn or newton)",
            self.input
        )
    }
}

impl Error for ParseFractalFamilyError {}

impl FromStr for FractalFamily {
    type Err = ParseFractalFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalised.as_str() {
            "mandelbrot" => Ok(Self::Mandelbrot),
            "julia" => Ok(Self::Julia),
            "burningship" => Ok(Self::BurningShip),
            "tricorn" | "mandelbar" => Ok(Self::Tricorn),
            "newton" => Ok(Self::Newton),
            _ => Err(ParseFractalFamilyError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_array_has_default_first() {
        assert_eq!(FractalFamily::ALL.first(), Some(&FractalFamily::default()));
        assert_eq!(FractalFamily::ALL.len(), 5);
    }

    #[test]
    fn display_names_are_unique() {
        let names: Vec<&str> = FractalFamily::ALL
            .iter()
            .map(|k| k.display_name())
            .collect();
        for (i, name) in names.iter().enumerate() {
            for (j, other) in names.iter().enumerate() {
                if i != j {
                    assert_ne!(name, other, "Duplicate display name: {}", name);
                }
            }
        }
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!("Burning Ship".parse(), Ok(FractalFamily::BurningShip));
        assert_eq!("burning-ship".parse(), Ok(FractalFamily::BurningShip));
        assert_eq!("JULIA".parse(), Ok(FractalFamily::Julia));
        assert_eq!("mandelbar".parse(), Ok(FractalFamily::Tricorn));
        assert!("sierpinski".parse::<FractalFamily>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for &family in FractalFamily::ALL {
            assert_eq!(family.to_string().parse(), Ok(family));
        }
    }

    #[test]
    fn seed_centers_match_family_defaults() {
        assert_eq!(FractalFamily::Mandelbrot.seed_center(), Complex::new(-0.5, 0.0));
        assert_eq!(FractalFamily::BurningShip.seed_center(), Complex::new(-0.5, -0.5));
        assert_eq!(FractalFamily::Newton.seed_center(), Complex::ZERO);
    }
}
