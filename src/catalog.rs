//! Selectable options: phone manufacturers and models, designs and materials.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Manufacturer name and its models, in dropdown order
const MANUFACTURERS: &[(&str, &[&str])] = &[
    (
        "Apple",
        &["iPhone SE", "iPhone 12", "iPhone 12 Pro", "iPhone 13", "iPhone 13 Pro"],
    ),
    (
        "Samsung",
        &["Galaxy S21", "Galaxy S21+", "Galaxy Note 20", "Galaxy A52"],
    ),
    ("Google", &["Pixel 4", "Pixel 4a", "Pixel 5", "Pixel 5a", "Pixel 6"]),
];

/// Label shown for an empty design/material/custom image selection
pub const NONE_LABEL: &str = "None";

/// All manufacturers in display order
pub fn manufacturers() -> impl Iterator<Item = &'static str> {
    MANUFACTURERS.iter().map(|(name, _)| *name)
}

/// Models of a manufacturer, or `None` if the manufacturer is unknown
pub fn models_for(manufacturer: &str) -> Option<&'static [&'static str]> {
    MANUFACTURERS
        .iter()
        .find(|(name, _)| *name == manufacturer)
        .map(|(_, models)| *models)
}

/// First model of a manufacturer, used when the manufacturer changes
pub fn default_model(manufacturer: &str) -> Option<&'static str> {
    models_for(manufacturer).and_then(|models| models.first().copied())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Design {
    Design1,
    Design2,
    Design3,
}

impl Design {
    pub const ALL: [Design; 3] = [Design::Design1, Design::Design2, Design::Design3];

    /// Asset file stem
    pub fn name(self) -> &'static str {
        match self {
            Design::Design1 => "Design1",
            Design::Design2 => "Design2",
            Design::Design3 => "Design3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Leder,
    Stoff,
    Holz,
    Plexiglas,
    Kork,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Leder,
        Material::Stoff,
        Material::Holz,
        Material::Plexiglas,
        Material::Kork,
    ];

    /// Asset file stem
    pub fn name(self) -> &'static str {
        match self {
            Material::Leder => "Leder",
            Material::Stoff => "Stoff",
            Material::Holz => "Holz",
            Material::Plexiglas => "Plexiglas",
            Material::Kork => "Kork",
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Design {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Design::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                kind: "design",
                value: s.to_string(),
            })
    }
}

impl FromStr for Material {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Material::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                kind: "material",
                value: s.to_string(),
            })
    }
}

/// Parse a dropdown value where "None" (or an empty string) means no selection
pub fn parse_optional<T: FromStr>(s: &str) -> Result<Option<T>, T::Err> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case(NONE_LABEL) {
        Ok(None)
    } else {
        s.parse().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_order() {
        let names: Vec<_> = manufacturers().collect();
        assert_eq!(names, vec!["Apple", "Samsung", "Google"]);
    }

    #[test]
    fn test_default_model_is_first() {
        assert_eq!(default_model("Apple"), Some("iPhone SE"));
        assert_eq!(default_model("Google"), Some("Pixel 4"));
        assert_eq!(default_model("Nokia"), None);
    }

    #[test]
    fn test_models_have_no_duplicates() {
        for name in manufacturers() {
            let models = models_for(name).unwrap();
            let mut sorted = models.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), models.len(), "{} has duplicates", name);
        }
    }

    #[test]
    fn test_parse_design() {
        assert_eq!("design2".parse::<Design>(), Ok(Design::Design2));
        let err = "Design9".parse::<Design>().unwrap_err();
        assert_eq!(err.to_string(), "unknown design: Design9");
    }

    #[test]
    fn test_parse_optional_none() {
        assert_eq!(parse_optional::<Material>("None"), Ok(None));
        assert_eq!(parse_optional::<Material>(""), Ok(None));
        assert_eq!(parse_optional::<Material>("Kork"), Ok(Some(Material::Kork)));
    }
}
