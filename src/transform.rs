use crate::config::MIN_SECTION_CHARS;
use crate::normalize::{CurrencyNormalizer, TextNormalizer};
use crate::types::{DetailSection, NormalizedListing, RawListing};

/// Known structured-content keys and their display labels.
pub const SECTION_LABELS: &[(&str, &str)] = &[
    ("company_brief", "Company Overview"),
    ("potential", "Growth Potential"),
    ("reason_for_sale", "Reason for Sale"),
    ("price_idea", "Pricing Details"),
    ("summary", "Summary"),
    ("description", "Description"),
    ("business_activity", "Business Activity"),
    ("market", "Market Information"),
    ("competition", "Competitive Situation"),
];

/// Turns one scraper record into the presentation document. Pure and infallible.
#[derive(Debug, Clone, Default)]
pub struct ListingTransformer {
    text: TextNormalizer,
    currency: CurrencyNormalizer,
}

impl ListingTransformer {
    pub fn new(text: TextNormalizer, currency: CurrencyNormalizer) -> Self {
        Self { text, currency }
    }

    pub fn transform(&self, raw: &RawListing) -> NormalizedListing {
        let mut details = Vec::new();

        let description = raw.full_description.as_deref().or(raw.description.as_deref());
        push_section(
            &mut details,
            "Business Description",
            self.text.normalize(description).into_iter().collect(),
        );

        for (key, content) in &raw.structured_content {
            if content.trim().chars().count() > MIN_SECTION_CHARS {
                push_section(&mut details, &section_label(key), vec![self.text.apply(content)]);
            }
        }

        push_section(&mut details, "Financial Information", self.financial_items(raw));

        let mut metrics = Vec::new();
        self.push_labeled(&mut metrics, "Employees", raw.employee_count.as_deref());
        push_section(&mut details, "Business Metrics", metrics);

        push_section(&mut details, "Contact Information", self.contact_items(raw));

        let title = raw.title.clone().unwrap_or_default();
        let category = raw.category.clone().unwrap_or_default();
        NormalizedListing {
            company: title.clone(),
            business_name: title.clone(),
            title,
            location: raw.location.clone().unwrap_or_default(),
            price: self.currency.normalize(raw.price.as_deref()),
            industry: category.clone(),
            category,
            link: raw.url.clone().unwrap_or_default(),
            details,
            contact_name: raw.broker_name.clone().unwrap_or_default(),
            phone_number: raw.phone.clone().unwrap_or_default(),
        }
    }

    fn financial_items(&self, raw: &RawListing) -> Vec<String> {
        let mut items = Vec::new();
        self.push_labeled(&mut items, "Revenue", raw.revenue.as_deref());
        self.push_labeled(&mut items, "Detailed Revenue", raw.detailed_revenue.as_deref());
        self.push_labeled(&mut items, "Profit Status", raw.profit_status.as_deref());
        self.push_labeled(&mut items, "Detailed Profit", raw.detailed_profit.as_deref());
        if raw.price.is_some() {
            items.push(format!(
                "Asking Price: {}",
                self.currency.normalize(raw.price.as_deref())
            ));
        }
        items.extend(raw.financial_details.iter().map(|d| self.text.apply(d)));
        items
    }

    fn contact_items(&self, raw: &RawListing) -> Vec<String> {
        let mut items = Vec::new();
        if let Some(phone) = &raw.phone {
            items.push(format!("Phone: {phone}"));
        }
        if let Some(email) = &raw.email {
            items.push(format!("Email: {email}"));
        }
        self.push_labeled(&mut items, "Broker", raw.broker_name.as_deref());
        self.push_labeled(&mut items, "Broker Company", raw.broker_company.as_deref());
        items
    }

    /// Appends `"{label}: {translated}"` when the value is present.
    fn push_labeled(&self, items: &mut Vec<String>, label: &str, value: Option<&str>) {
        if let Some(v) = self.text.normalize(value) {
            items.push(format!("{label}: {v}"));
        }
    }
}

/// The one place a section is added: empty item lists never become sections.
fn push_section(details: &mut Vec<DetailSection>, label: &str, items: Vec<String>) {
    if items.is_empty() {
        return;
    }
    details.push(DetailSection {
        label: label.to_string(),
        items,
    });
}

pub fn section_label(key: &str) -> String {
    SECTION_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| title_case(&key.replace('_', " ")))
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
