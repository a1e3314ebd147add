//! Shopping list download bodies.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::domain::types::ShoppingListItem;

pub const CSV_HEADER: &str = "name,measurement_unit,amount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShoppingListFormat {
    #[default]
    Csv,
    Txt,
}

impl FromStr for ShoppingListFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            _ => Err(()),
        }
    }
}

impl ShoppingListFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Txt => "text/plain; charset=utf-8",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "shopping_list.csv",
            Self::Txt => "shopping_list.txt",
        }
    }

    pub fn content_disposition(self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name())
    }

    pub fn render(self, items: &[ShoppingListItem]) -> String {
        match self {
            Self::Csv => render_csv(items),
            Self::Txt => render_txt(items),
        }
    }
}

/// Header row plus one CRLF-terminated row per item.
fn render_csv(items: &[ShoppingListItem]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 2 + items.len() * 32);
    out.push_str(CSV_HEADER);
    out.push_str("\r\n");
    for item in items {
        // writing into a String cannot fail
        let _ = write!(
            out,
            "{},{},{}\r\n",
            csv_field(&item.name),
            csv_field(&item.measurement_unit),
            item.amount
        );
    }
    out
}

fn render_txt(items: &[ShoppingListItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{} ({}) - {}", item.name, item.measurement_unit, item.amount);
    }
    out
}

/// Quote a field when it holds a comma, quote, CR or LF; inner quotes are doubled.
fn csv_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}
