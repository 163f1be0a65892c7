//! Field type enumeration and per-type validation rules.
//!
//! Every question in a wizard step has one of a fixed set of types. Choice
//! types carry an ordered list of options; all other types store `NULL`
//! options. Respondent values are plain text whose accepted shape depends
//! on the type.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::wizard::is_hex_color;

// ---------------------------------------------------------------------------
// Field type
// ---------------------------------------------------------------------------

/// The kind of input a field renders and the values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[serde(alias = "text")]
    TextInput,
    LongText,
    Dropdown,
    Toggle,
    Radio,
    ColorPicker,
    FontPicker,
    ImageUpload,
}

/// All field types, in the order the editor palette lists them.
pub const ALL_FIELD_TYPES: [FieldType; 8] = [
    FieldType::TextInput,
    FieldType::LongText,
    FieldType::Dropdown,
    FieldType::Toggle,
    FieldType::Radio,
    FieldType::ColorPicker,
    FieldType::FontPicker,
    FieldType::ImageUpload,
];

impl FieldType {
    /// Parse a field type string from the database or a request.
    ///
    /// `text` is accepted as a legacy spelling of `text_input`.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "text_input" | "text" => Ok(Self::TextInput),
            "long_text" => Ok(Self::LongText),
            "dropdown" => Ok(Self::Dropdown),
            "toggle" => Ok(Self::Toggle),
            "radio" => Ok(Self::Radio),
            "color_picker" => Ok(Self::ColorPicker),
            "font_picker" => Ok(Self::FontPicker),
            "image_upload" => Ok(Self::ImageUpload),
            _ => Err(CoreError::Validation(format!(
                "Invalid field type '{s}'. Must be one of: text_input, long_text, dropdown, \
                 toggle, radio, color_picker, font_picker, image_upload"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextInput => "text_input",
            Self::LongText => "long_text",
            Self::Dropdown => "dropdown",
            Self::Toggle => "toggle",
            Self::Radio => "radio",
            Self::ColorPicker => "color_picker",
            Self::FontPicker => "font_picker",
            Self::ImageUpload => "image_upload",
        }
    }

    /// Whether this type presents a fixed list of choices.
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::Dropdown | Self::Radio)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Validate and normalize the options for a field of `field_type`.
///
/// Choice types need a non-empty list of non-blank, distinct strings; order
/// is preserved exactly. Every other type stores no options, so anything
/// supplied is dropped.
pub fn normalize_options(
    field_type: FieldType,
    options: Option<Vec<String>>,
) -> Result<Option<Vec<String>>, CoreError> {
    if !field_type.requires_options() {
        return Ok(None);
    }

    let options = options.unwrap_or_default();
    if options.is_empty() {
        return Err(CoreError::Validation(format!(
            "Field type '{field_type}' requires a non-empty list of options"
        )));
    }
    for (i, option) in options.iter().enumerate() {
        if option.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Option {} must not be blank",
                i + 1
            )));
        }
        if options[..i].contains(option) {
            return Err(CoreError::Validation(format!(
                "Duplicate option '{option}'"
            )));
        }
    }
    Ok(Some(options))
}

/// Decode the JSON `options` column into a list of strings.
///
/// `NULL` and non-array values decode to `None`; non-string array entries
/// are skipped.
pub fn options_from_json(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    value.and_then(|v| v.as_array()).map(|arr| {
        arr.iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

/// Encode options for the JSON `options` column.
pub fn options_to_json(options: Option<&[String]>) -> Option<serde_json::Value> {
    options.map(|opts| serde_json::Value::from(opts.to_vec()))
}

// ---------------------------------------------------------------------------
// Respondent values
// ---------------------------------------------------------------------------

/// Validate a respondent value against the field's type and options.
///
/// An empty value is always accepted (it clears the answer); required-ness
/// is enforced at navigation time, not here.
pub fn validate_value(
    field_type: FieldType,
    options: Option<&[String]>,
    value: &str,
) -> Result<(), CoreError> {
    if value.is_empty() {
        return Ok(());
    }

    match field_type {
        FieldType::TextInput | FieldType::LongText | FieldType::FontPicker => Ok(()),
        FieldType::Dropdown | FieldType::Radio => {
            let options = options.unwrap_or_default();
            if options.iter().any(|o| o == value) {
                Ok(())
            } else {
                Err(CoreError::Validation(format!(
                    "'{value}' is not one of the options for this {field_type} field"
                )))
            }
        }
        FieldType::Toggle => match value {
            "true" | "false" => Ok(()),
            _ => Err(CoreError::Validation(format!(
                "Toggle value must be 'true' or 'false', got '{value}'"
            ))),
        },
        FieldType::ColorPicker => {
            if is_hex_color(value) {
                Ok(())
            } else {
                Err(CoreError::Validation(format!(
                    "Color value must be #rgb or #rrggbb, got '{value}'"
                )))
            }
        }
        FieldType::ImageUpload => {
            if is_asset_url(value) {
                Ok(())
            } else {
                Err(CoreError::Validation(
                    "Image upload value must be the http(s) URL of the uploaded asset".to_string(),
                ))
            }
        }
    }
}

/// Whether `value` counts as an answer for a required field.
///
/// For image uploads the value must be the uploaded asset URL; for every
/// other type any non-blank text counts.
pub fn is_answered(field_type: FieldType, value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => field_type != FieldType::ImageUpload || is_asset_url(v),
    }
}

fn is_asset_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.contains(char::is_whitespace))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
