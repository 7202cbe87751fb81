//! Template catalogue and payload formatting.
//!
//! Formatting assumes the value already passed validation for its class and
//! never validates on its own: malformed WiFi or contact input comes back
//! unchanged instead of failing.

use crate::class::ContentClass;
use crate::rules::split_fields;
use serde::Serialize;

/// A selectable QR template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QrTemplate {
    /// Content class this template produces
    pub id: ContentClass,
    /// Display name
    pub name: &'static str,
    /// Input hint shown to the user
    pub placeholder: &'static str,
}

impl QrTemplate {
    /// Format a value into this template's payload.
    #[must_use]
    pub fn format(&self, value: &str) -> String {
        format(self.id, value)
    }

    /// Look up the template for a content class.
    #[must_use]
    pub fn for_class(class: ContentClass) -> &'static QrTemplate {
        // TEMPLATES holds one entry per class in `ContentClass::all()` order
        TEMPLATES
            .iter()
            .find(|template| template.id == class)
            .unwrap_or(&TEMPLATES[0])
    }
}

/// The fixed template set, one per content class.
pub static TEMPLATES: [QrTemplate; 6] = [
    QrTemplate {
        id: ContentClass::Text,
        name: "Plain Text",
        placeholder: "Enter any text...",
    },
    QrTemplate {
        id: ContentClass::Url,
        name: "Website URL",
        placeholder: "https://example.com",
    },
    QrTemplate {
        id: ContentClass::Wifi,
        name: "WiFi Network",
        placeholder: "NetworkName,Password,WPA2",
    },
    QrTemplate {
        id: ContentClass::Contact,
        name: "Contact Card",
        placeholder: "John Doe,+1234567890,john@example.com",
    },
    QrTemplate {
        id: ContentClass::Email,
        name: "Email Address",
        placeholder: "someone@example.com",
    },
    QrTemplate {
        id: ContentClass::Phone,
        name: "Phone Number",
        placeholder: "+1234567890",
    },
];

/// Tracks which template is selected. Exactly one is selected at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSelection {
    selected: ContentClass,
}

impl Default for TemplateSelection {
    fn default() -> Self {
        Self {
            selected: ContentClass::Text,
        }
    }
}

impl TemplateSelection {
    /// Selection starting at the default `text` template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to another template.
    pub fn select(&mut self, class: ContentClass) {
        tracing::debug!(template = %class, "template selected");
        self.selected = class;
    }

    /// The selected template.
    #[must_use]
    pub fn current(&self) -> &'static QrTemplate {
        QrTemplate::for_class(self.selected)
    }
}

/// Map a value to the payload string for `class`.
#[must_use]
pub fn format(class: ContentClass, value: &str) -> String {
    match class {
        ContentClass::Text => value.to_string(),
        ContentClass::Url => {
            if value.starts_with("http") {
                value.to_string()
            } else {
                format!("https://{value}")
            }
        }
        ContentClass::Wifi => match split_fields(value).as_slice() {
            [ssid, password, security, ..] => {
                format!("WIFI:T:{security};S:{ssid};P:{password};;")
            }
            _ => value.to_string(),
        },
        ContentClass::Contact => match split_fields(value).as_slice() {
            [name, phone, email, ..] => format!(
                "BEGIN:VCARD\nVERSION:3.0\nFN:{name}\nTEL:{phone}\nEMAIL:{email}\nEND:VCARD"
            ),
            _ => value.to_string(),
        },
        ContentClass::Email => format!("mailto:{value}"),
        ContentClass::Phone => format!("tel:{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_covers_every_class_once() {
        assert_eq!(TEMPLATES.len(), ContentClass::all().len());
        for (template, class) in TEMPLATES.iter().zip(ContentClass::all()) {
            assert_eq!(template.id, *class);
            assert_eq!(QrTemplate::for_class(*class).id, *class);
        }
    }

    #[test]
    fn test_selection_defaults_to_text() {
        let mut selection = TemplateSelection::new();
        assert_eq!(selection.current().id, ContentClass::Text);

        selection.select(ContentClass::Wifi);
        assert_eq!(selection.current().name, "WiFi Network");
    }

    #[test]
    fn test_format_text_is_identity() {
        assert_eq!(format(ContentClass::Text, " as-is "), " as-is ");
    }

    #[test]
    fn test_format_url_prefix() {
        assert_eq!(format(ContentClass::Url, "example.com"), "https://example.com");
        assert_eq!(format(ContentClass::Url, "http://x.org"), "http://x.org");
    }

    #[test]
    fn test_format_wifi() {
        assert_eq!(
            format(ContentClass::Wifi, "MyNet,pass123,wpa2"),
            "WIFI:T:wpa2;S:MyNet;P:pass123;;"
        );
        assert_eq!(format(ContentClass::Wifi, "MyNet,pass"), "MyNet,pass");
    }

    #[test]
    fn test_format_contact() {
        let card = format(ContentClass::Contact, "Jane,555-1234,jane@x.com");
        assert!(card.starts_with("BEGIN:VCARD\n"));
        assert!(card.ends_with("\nEND:VCARD"));
        assert!(card.contains("VERSION:3.0"));
        assert!(card.contains("FN:Jane"));
        assert!(card.contains("TEL:555-1234"));
        assert!(card.contains("EMAIL:jane@x.com"));

        assert_eq!(format(ContentClass::Contact, "Jane"), "Jane");
    }

    #[test]
    fn test_format_email_and_phone() {
        assert_eq!(format(ContentClass::Email, "a@b.co"), "mailto:a@b.co");
        assert_eq!(format(ContentClass::Phone, "+15551234"), "tel:+15551234");
    }

    #[test]
    fn test_template_format_delegates() {
        let template = QrTemplate::for_class(ContentClass::Phone);
        assert_eq!(template.format("123"), "tel:123");
    }
}
