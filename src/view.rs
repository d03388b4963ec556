//! Plain-text rendering of the overview state

use crate::models::{FetchStatus, MarsProperty};

pub fn render_listing(properties: &[MarsProperty]) -> String {
    if properties.is_empty() {
        return "No properties.".to_string();
    }

    let mut out = format!("Found {} properties:\n", properties.len());
    for property in properties {
        out.push_str(&format!(
            "{:<8} {:<5} {:>16}\n",
            property.id,
            property.kind,
            property.display_price()
        ));
    }
    out
}

/// Detail view shown after navigating to a property
pub fn render_detail(property: &MarsProperty) -> String {
    let kind = if property.is_rental() { "Rent" } else { "Sale" };
    format!(
        "Property {}\n  Type:  {}\n  Price: {}\n  Image: {}\n",
        property.id,
        kind,
        property.display_price(),
        property.img_src_url
    )
}

pub fn render_status(status: Option<FetchStatus>) -> String {
    match status {
        Some(FetchStatus::Error) => "Error: could not load Mars properties".to_string(),
        Some(status) => format!("Status: {}", status.as_str()),
        None => "Status: -".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(id: &str, kind: &str, price: f64) -> MarsProperty {
        MarsProperty {
            id: id.to_string(),
            img_src_url: "http://example.com/mars.jpg".to_string(),
            kind: kind.to_string(),
            price,
        }
    }

    #[test]
    fn test_render_listing() {
        let out = render_listing(&[property("424905", "buy", 450000.0), property("424906", "rent", 1200.0)]);
        assert!(out.starts_with("Found 2 properties:"));
        assert!(out.contains("$450,000"));
        assert!(out.contains("$1,200/month"));
        assert_eq!(render_listing(&[]), "No properties.");
    }

    #[test]
    fn test_render_detail() {
        let out = render_detail(&property("424906", "rent", 1200.0));
        assert!(out.contains("Property 424906"));
        assert!(out.contains("Type:  Rent"));
        assert!(out.contains("http://example.com/mars.jpg"));
    }

    #[test]
    fn test_render_status() {
        assert_eq!(render_status(None), "Status: -");
        assert_eq!(render_status(Some(FetchStatus::Done)), "Status: done");
        assert!(render_status(Some(FetchStatus::Error)).starts_with("Error"));
    }
}
