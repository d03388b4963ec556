use serde::{Deserialize, Serialize};

/// A single Mars real-estate listing as returned by the Mars API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarsProperty {
    pub id: String,
    #[serde(rename = "img_src")]
    pub img_src_url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
}

impl MarsProperty {
    pub fn is_rental(&self) -> bool {
        self.kind == PropertyFilter::ShowRent.as_str()
    }

    /// Price formatted for display, e.g. `$450,000` or `$1,200/month`
    pub fn display_price(&self) -> String {
        let amount = format_thousands(self.price.round() as i64);
        if self.is_rental() {
            format!("${}/month", amount)
        } else {
            format!("${}", amount)
        }
    }
}

fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Selector passed to the Mars API to narrow the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyFilter {
    ShowRent,
    ShowBuy,
    #[default]
    ShowAll,
}

impl PropertyFilter {
    /// Query parameter value understood by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyFilter::ShowRent => "rent",
            PropertyFilter::ShowBuy => "buy",
            PropertyFilter::ShowAll => "all",
        }
    }
}

impl std::str::FromStr for PropertyFilter {
    type Err = anyhow::Error;

    fn from_str(filter: &str) -> Result<Self, Self::Err> {
        match filter.to_lowercase().as_str() {
            "rent" | "rental" => Ok(PropertyFilter::ShowRent),
            "buy" | "sale" => Ok(PropertyFilter::ShowBuy),
            "all" | "any" => Ok(PropertyFilter::ShowAll),
            other => Err(anyhow::anyhow!(
                "Unsupported filter: {}. Supported filters: all, rent, buy",
                other
            )),
        }
    }
}

impl std::fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the most recent fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Error,
    Done,
}

impl FetchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            FetchStatus::Loading => "loading",
            FetchStatus::Error => "error",
            FetchStatus::Done => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(kind: &str, price: f64) -> MarsProperty {
        MarsProperty {
            id: "424906".to_string(),
            img_src_url: "http://mars.jpl.nasa.gov/msl-raw-images/msss/01000/mcam/1000ML0044631300305227E03_DXXX.jpg".to_string(),
            kind: kind.to_string(),
            price,
        }
    }

    #[test]
    fn test_display_price() {
        assert_eq!(property("buy", 450000.0).display_price(), "$450,000");
        assert_eq!(property("rent", 1200.0).display_price(), "$1,200/month");
        assert_eq!(property("buy", 999.0).display_price(), "$999");
        assert_eq!(property("buy", 8_000_000.0).display_price(), "$8,000,000");
    }

    #[test]
    fn test_is_rental() {
        assert!(property("rent", 1.0).is_rental());
        assert!(!property("buy", 1.0).is_rental());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("rent".parse::<PropertyFilter>().unwrap(), PropertyFilter::ShowRent);
        assert_eq!("BUY".parse::<PropertyFilter>().unwrap(), PropertyFilter::ShowBuy);
        assert_eq!("all".parse::<PropertyFilter>().unwrap(), PropertyFilter::ShowAll);
        assert!("lease".parse::<PropertyFilter>().is_err());
    }

    #[test]
    fn test_property_wire_names() {
        let json = r#"{"price":450000,"id":"424905","type":"buy","img_src":"http://example.com/a.jpg"}"#;
        let parsed: MarsProperty = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, "424905");
        assert_eq!(parsed.kind, "buy");
        assert_eq!(parsed.img_src_url, "http://example.com/a.jpg");
        assert_eq!(parsed.price, 450000.0);
    }
}
