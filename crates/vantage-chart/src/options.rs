//! Configuration values a host hands to a chart model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Additional options for rendering a chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Allow the GPU-accelerated rendering path.
    ///
    /// Unset means allowed; only an explicit `Some(false)` disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webgl: Option<bool>,
}

impl RenderOptions {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the webgl option.
    pub fn with_webgl(mut self, webgl: bool) -> Self {
        self.webgl = Some(webgl);
        self
    }

    /// Whether the GPU path may be used.
    pub fn is_webgl_enabled(&self) -> bool {
        self.webgl.unwrap_or(true)
    }
}

/// The bounding rectangle a chart was last rendered into.
///
/// Layouts often express positions as fractions of the plot area; the
/// `resolve_*` and `fraction_*` helpers convert between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns `true` if either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Pixel width covered by `fraction` of this rectangle.
    pub fn resolve_x(&self, fraction: f64) -> f64 {
        self.width * fraction
    }

    /// Pixel height covered by `fraction` of this rectangle.
    pub fn resolve_y(&self, fraction: f64) -> f64 {
        self.height * fraction
    }

    /// Fraction of the width that `pixels` covers; `0.0` for an empty rect.
    pub fn fraction_x(&self, pixels: f64) -> f64 {
        if self.width > 0.0 {
            pixels / self.width
        } else {
            0.0
        }
    }

    /// Fraction of the height that `pixels` covers; `0.0` for an empty rect.
    pub fn fraction_y(&self, pixels: f64) -> f64 {
        if self.height > 0.0 {
            pixels / self.height
        } else {
            0.0
        }
    }
}

/// Broad family of a column type, used to pick a default format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Floating point and arbitrary precision decimals.
    Decimal,
    /// Integral types.
    Integer,
    /// Timestamps and dates.
    DateTime,
    /// Anything else (strings, booleans, objects).
    Other,
}

impl ColumnKind {
    /// Classify a column type name as reported by the data source.
    pub fn from_type_name(type_name: &str) -> Self {
        let short = type_name.rsplit('.').next().unwrap_or(type_name).to_ascii_lowercase();
        match short.as_str() {
            "double" | "float" | "bigdecimal" => Self::Decimal,
            "int" | "integer" | "long" | "short" | "byte" | "biginteger" => Self::Integer,
            "datetime" | "instant" | "zoneddatetime" | "localdate" | "date" => Self::DateTime,
            _ => Self::Other,
        }
    }
}

/// A formatting rule bound to one named column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFormatRule {
    /// Column name the rule applies to.
    pub column_name: String,
    /// Column type the rule applies to.
    pub column_type: String,
    /// Format pattern.
    pub pattern: String,
}

/// Value-to-display-string rules for a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Formatter {
    /// Time zone used for date-time values.
    pub time_zone: Option<String>,
    /// Whether to append the time zone to formatted date-times.
    pub show_time_zone: bool,
    /// Default pattern for date-time columns.
    pub date_time_pattern: Option<String>,
    /// Default pattern for decimal columns.
    pub decimal_pattern: Option<String>,
    /// Default pattern for integer columns.
    pub integer_pattern: Option<String>,
    /// Per-column overrides, checked before the defaults.
    pub column_rules: Vec<ColumnFormatRule>,
}

impl Formatter {
    /// An empty formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Adds a per-column rule.
    pub fn with_column_rule(
        mut self,
        column_name: impl Into<String>,
        column_type: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.column_rules.push(ColumnFormatRule {
            column_name: column_name.into(),
            column_type: column_type.into(),
            pattern: pattern.into(),
        });
        self
    }

    /// The pattern to use for a column, if any.
    ///
    /// A matching column rule wins over the default for the column's kind.
    pub fn pattern_for(&self, column_name: &str, column_type: &str) -> Option<&str> {
        if let Some(rule) = self
            .column_rules
            .iter()
            .find(|rule| rule.column_name == column_name && rule.column_type == column_type)
        {
            return Some(&rule.pattern);
        }

        match ColumnKind::from_type_name(column_type) {
            ColumnKind::Decimal => self.decimal_pattern.as_deref(),
            ColumnKind::Integer => self.integer_pattern.as_deref(),
            ColumnKind::DateTime => self.date_time_pattern.as_deref(),
            ColumnKind::Other => None,
        }
    }
}

/// A column a chart can be filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterColumn {
    /// Column name in the data source.
    pub name: String,
    /// Column type name.
    #[serde(rename = "type")]
    pub column_type: String,
}

impl FilterColumn {
    /// Creates a filter column description.
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// Filterable columns, keyed by the identifier the host shows to users.
pub type FilterColumnMap = BTreeMap<String, FilterColumn>;

/// Filter expressions, keyed by column identifier.
pub type FilterMap = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webgl_defaults_to_enabled() {
        assert!(RenderOptions::new().is_webgl_enabled());
        assert!(RenderOptions::new().with_webgl(true).is_webgl_enabled());
        assert!(!RenderOptions::new().with_webgl(false).is_webgl_enabled());
    }

    #[test]
    fn test_rect_percent_math() {
        let rect = Rect::new(10.0, 20.0, 400.0, 200.0);
        assert_eq!(rect.right(), 410.0);
        assert_eq!(rect.bottom(), 220.0);
        assert_eq!(rect.resolve_x(0.25), 100.0);
        assert_eq!(rect.resolve_y(0.5), 100.0);
        assert_eq!(rect.fraction_x(100.0), 0.25);
        assert_eq!(rect.fraction_y(50.0), 0.25);
    }

    #[test]
    fn test_empty_rect_fractions() {
        let rect = Rect::default();
        assert!(rect.is_empty());
        assert_eq!(rect.fraction_x(10.0), 0.0);
        assert_eq!(rect.fraction_y(10.0), 0.0);
    }

    #[test]
    fn test_column_kind_classification() {
        assert_eq!(ColumnKind::from_type_name("double"), ColumnKind::Decimal);
        assert_eq!(
            ColumnKind::from_type_name("java.math.BigDecimal"),
            ColumnKind::Decimal
        );
        assert_eq!(ColumnKind::from_type_name("long"), ColumnKind::Integer);
        assert_eq!(
            ColumnKind::from_type_name("java.time.Instant"),
            ColumnKind::DateTime
        );
        assert_eq!(
            ColumnKind::from_type_name("java.lang.String"),
            ColumnKind::Other
        );
    }

    #[test]
    fn test_formatter_rule_precedence() {
        let formatter = Formatter {
            decimal_pattern: Some("0.00".into()),
            ..Formatter::new()
        }
        .with_column_rule("Price", "double", "$0.00");

        assert_eq!(formatter.pattern_for("Price", "double"), Some("$0.00"));
        assert_eq!(formatter.pattern_for("Size", "double"), Some("0.00"));
        assert_eq!(formatter.pattern_for("Size", "long"), None);
        assert_eq!(formatter.pattern_for("Sym", "java.lang.String"), None);
    }

    #[test]
    fn test_filter_column_serializes_type_key() {
        let column = FilterColumn::new("Sym", "java.lang.String");
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["type"], "java.lang.String");
        assert_eq!(json["name"], "Sym");
    }
}
