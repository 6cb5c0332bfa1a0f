use uuid::Uuid;

/// Countries accepted by the top-headlines endpoint.
const KNOWN_COUNTRIES: &[(&str, &str)] = &[
    ("ae", "United Arab Emirates"),
    ("ar", "Argentina"),
    ("at", "Austria"),
    ("au", "Australia"),
    ("be", "Belgium"),
    ("bg", "Bulgaria"),
    ("br", "Brazil"),
    ("ca", "Canada"),
    ("ch", "Switzerland"),
    ("cn", "China"),
    ("co", "Colombia"),
    ("cu", "Cuba"),
    ("cz", "Czechia"),
    ("de", "Germany"),
    ("eg", "Egypt"),
    ("fr", "France"),
    ("gb", "United Kingdom"),
    ("gr", "Greece"),
    ("hk", "Hong Kong"),
    ("hu", "Hungary"),
    ("id", "Indonesia"),
    ("ie", "Ireland"),
    ("il", "Israel"),
    ("in", "India"),
    ("it", "Italy"),
    ("jp", "Japan"),
    ("kr", "South Korea"),
    ("lt", "Lithuania"),
    ("lv", "Latvia"),
    ("ma", "Morocco"),
    ("mx", "Mexico"),
    ("my", "Malaysia"),
    ("ng", "Nigeria"),
    ("nl", "Netherlands"),
    ("no", "Norway"),
    ("nz", "New Zealand"),
    ("ph", "Philippines"),
    ("pl", "Poland"),
    ("pt", "Portugal"),
    ("ro", "Romania"),
    ("rs", "Serbia"),
    ("ru", "Russia"),
    ("sa", "Saudi Arabia"),
    ("se", "Sweden"),
    ("sg", "Singapore"),
    ("si", "Slovenia"),
    ("sk", "Slovakia"),
    ("th", "Thailand"),
    ("tr", "Turkey"),
    ("tw", "Taiwan"),
    ("ua", "Ukraine"),
    ("us", "United States"),
    ("ve", "Venezuela"),
    ("za", "South Africa"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

impl Country {
    /// The id is derived from the code so the same country always has the same id.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        let code = code.into().to_ascii_lowercase();
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, code.as_bytes()),
            name: name.into(),
            code,
        }
    }

    pub fn known() -> Vec<Country> {
        KNOWN_COUNTRIES
            .iter()
            .map(|(code, name)| Country::new(*name, *code))
            .collect()
    }

    pub fn find(code: &str) -> Option<Country> {
        KNOWN_COUNTRIES
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
            .map(|(code, name)| Country::new(*name, *code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        let us = Country::find("US").unwrap();
        assert_eq!(us.code, "us");
        assert_eq!(us.name, "United States");
        assert!(Country::find("xx").is_none());
    }

    #[test]
    fn ids_are_stable_per_code() {
        assert_eq!(Country::find("br").unwrap().id, Country::new("Brasil", "BR").id);
        assert_ne!(Country::find("br").unwrap().id, Country::find("us").unwrap().id);
    }

    #[test]
    fn known_codes_are_two_letters() {
        assert!(Country::known().iter().all(|c| c.code.len() == 2));
    }
}
