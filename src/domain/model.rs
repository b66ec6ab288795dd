use serde::{Deserialize, Deserializer, Serialize};

/// One row of the animal nutrient standards table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalStandard {
    #[serde(rename = "Animal_ID")]
    pub animal_id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Tolerance_Pct")]
    pub tolerance_pct: f64,
    #[serde(rename = "ME_Target")]
    pub me_target: f64,
    #[serde(rename = "CP_Target")]
    pub cp_target: f64,
    #[serde(rename = "Ca_Target")]
    pub ca_target: f64,
    #[serde(rename = "P_Target")]
    pub p_target: f64,
    #[serde(
        rename = "Lysine_Target",
        default,
        deserialize_with = "optional_number"
    )]
    pub lysine_target: Option<f64>,
}

impl AnimalStandard {
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "Animal_ID",
        "Description",
        "Tolerance_Pct",
        "ME_Target",
        "CP_Target",
        "Ca_Target",
        "P_Target",
    ];
    pub const OPTIONAL_COLUMNS: &'static [&'static str] = &["Lysine_Target"];

    /// `None` means the nutrient is reported but not checked.
    pub fn target(&self, nutrient: Nutrient) -> Option<f64> {
        match nutrient {
            Nutrient::Me => Some(self.me_target),
            Nutrient::Cp => Some(self.cp_target),
            Nutrient::Ca => Some(self.ca_target),
            Nutrient::P => Some(self.p_target),
            Nutrient::Lysine => self.lysine_target,
        }
    }
}

/// One row of the feed composition table. Nutrient values are per 100 units of feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(rename = "Feed_ID")]
    pub feed_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Max_Inclusion_Pct")]
    pub max_inclusion_pct: f64,
    #[serde(rename = "ME_per_kg")]
    pub me_per_kg: f64,
    #[serde(rename = "CP_Pct")]
    pub cp_pct: f64,
    #[serde(rename = "Ca_Pct")]
    pub ca_pct: f64,
    #[serde(rename = "P_Pct")]
    pub p_pct: f64,
    #[serde(rename = "Lysine_Pct")]
    pub lysine_pct: f64,
}

impl Feed {
    pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "Feed_ID",
        "Name",
        "Max_Inclusion_Pct",
        "ME_per_kg",
        "CP_Pct",
        "Ca_Pct",
        "P_Pct",
        "Lysine_Pct",
    ];
    pub const OPTIONAL_COLUMNS: &'static [&'static str] = &[];

    pub fn value(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Me => self.me_per_kg,
            Nutrient::Cp => self.cp_pct,
            Nutrient::Ca => self.ca_pct,
            Nutrient::P => self.p_pct,
            Nutrient::Lysine => self.lysine_pct,
        }
    }

    /// Contribution of `quantity` units of this feed to `nutrient`.
    pub fn contribution(&self, nutrient: Nutrient, quantity: f64) -> f64 {
        quantity * self.value(nutrient) / 100.0
    }
}

/// Rows addressable by their identifier column.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for AnimalStandard {
    fn key(&self) -> &str {
        &self.animal_id
    }
}

impl Keyed for Feed {
    fn key(&self) -> &str {
        &self.feed_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    #[serde(rename = "ME")]
    Me,
    #[serde(rename = "CP")]
    Cp,
    Ca,
    P,
    Lysine,
}

impl Nutrient {
    pub const ALL: [Nutrient; 5] = [
        Nutrient::Me,
        Nutrient::Cp,
        Nutrient::Ca,
        Nutrient::P,
        Nutrient::Lysine,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::Me => "Metabolizable Energy (ME)",
            Nutrient::Cp => "Crude Protein (CP %)",
            Nutrient::Ca => "Calcium (Ca %)",
            Nutrient::P => "Phosphorus (P %)",
            Nutrient::Lysine => "Lysine (%)",
        }
    }

    fn index(&self) -> usize {
        match self {
            Nutrient::Me => 0,
            Nutrient::Cp => 1,
            Nutrient::Ca => 2,
            Nutrient::P => 3,
            Nutrient::Lysine => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DietEntry {
    pub feed_id: String,
    pub quantity: f64,
}

/// Per-nutrient accumulated contributions, kept at full precision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutrientTotals {
    values: [f64; 5],
}

impl NutrientTotals {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        self.values[nutrient.index()]
    }

    pub fn add(&mut self, nutrient: Nutrient, amount: f64) {
        self.values[nutrient.index()] += amount;
    }

    pub fn merge(&mut self, other: &NutrientTotals) {
        for nutrient in Nutrient::ALL {
            self.add(nutrient, other.get(nutrient));
        }
    }

    pub fn ca_p_ratio(&self) -> f64 {
        safe_ratio(self.get(Nutrient::Ca), self.get(Nutrient::P))
    }

    pub fn me_cp_ratio(&self) -> f64 {
        safe_ratio(self.get(Nutrient::Me), self.get(Nutrient::Cp))
    }
}

/// Ratio that reads as 0 whenever the denominator is not positive.
///
/// A zero total and a negative one (possible only with negative table values)
/// both yield 0 rather than a division result.
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl Serialize for NutrientTotals {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Nutrient::ALL.len()))?;
        for nutrient in Nutrient::ALL {
            map.serialize_entry(&nutrient, &self.get(nutrient))?;
        }
        map.end()
    }
}

/// Accepts an empty cell or the usual missing-value markers as `None`.
fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("-") | Some("NA") | Some("N/A") | Some("NaN") | Some("nan") => {
            Ok(None)
        }
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", text))),
    }
}
