use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Read access to a named field of an opaque record.
///
/// The data view never interprets a record beyond this lookup. A missing field
/// is `None` and compares like an empty string while searching.
pub trait Record {
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl Record for HashMap<String, String> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

/// Shown in place of a missing cell.
pub const NULL_GLYPH: &str = "∅";

/// One loaded record. Headers are shared between all rows of a dataset.
///
/// Missing cells are kept as `None`: they look like [`NULL_GLYPH`] on screen
/// but have no field value, so a search never matches them.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    headers: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Row {
    pub fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self::with_nulls(headers, values.into_iter().map(Some).collect())
    }

    pub fn with_nulls(headers: Arc<[String]>, values: Vec<Option<String>>) -> Self {
        debug_assert_eq!(headers.len(), values.len());
        Self { headers, values }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Raw cell value, `None` when out of range or missing.
    pub fn value(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).and_then(|v| v.as_deref())
    }

    /// Cell as shown on screen.
    pub fn display(&self, idx: usize) -> &str {
        match self.values.get(idx) {
            Some(Some(v)) => v,
            Some(None) => NULL_GLYPH,
            None => "",
        }
    }

    /// (header, displayed value) pairs in column order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(|v| v.as_deref().unwrap_or(NULL_GLYPH)))
    }

    /// Row as a single CSV line, quoting cells that need it. Missing cells are empty.
    pub fn to_csv_line(&self) -> String {
        self.values
            .iter()
            .map(|c| wrap_cell_content(c.as_deref().unwrap_or_default()))
            .collect::<Vec<String>>()
            .join(",")
    }
}

impl Record for Row {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.headers
            .iter()
            .position(|h| h == key)
            .and_then(|idx| self.value(idx))
            .map(Cow::Borrowed)
    }
}

fn wrap_cell_content(c: &str) -> String {
    let needs_escaping = c.contains('"');
    let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
    let mut out = String::from(c);

    if needs_escaping {
        out = out.replace('"', "\"\"");
    }
    if needs_wrapping || needs_escaping {
        out = format!("\"{out}\"");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Row {
        let headers: Arc<[String]> = vec!["id".to_string(), "name".to_string(), "dept".to_string()].into();
        Row::new(headers, values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn field_lookup_by_header() {
        let r = row(&["7", "Siti Aminah", "Finance"]);
        assert_eq!(r.field("name").as_deref(), Some("Siti Aminah"));
        assert_eq!(r.field("dept").as_deref(), Some("Finance"));
        assert_eq!(r.field("salary"), None);
    }

    #[test]
    fn maps_are_records() {
        let mut m = HashMap::new();
        m.insert("name".to_string(), "Budi".to_string());
        assert_eq!(m.field("name").as_deref(), Some("Budi"));
        assert_eq!(m.field("nik"), None);

        let b: BTreeMap<String, String> = m.into_iter().collect();
        assert_eq!(b.field("name").as_deref(), Some("Budi"));
    }

    #[test]
    fn csv_line_quotes_when_needed() {
        let r = row(&["1", "Dewi, S.Kom", "say \"hi\""]);
        assert_eq!(r.to_csv_line(), "1,\"Dewi, S.Kom\",\"say \"\"hi\"\"\"");
    }

    #[test]
    fn missing_cell_has_no_field_value() {
        let headers: Arc<[String]> = vec!["id".to_string(), "name".to_string(), "dept".to_string()].into();
        let r = Row::with_nulls(headers, vec![Some("3".into()), Some("Andi".into()), None]);
        assert_eq!(r.field("dept"), None);
        assert_eq!(r.value(2), None);
        assert_eq!(r.display(2), NULL_GLYPH);
        assert_eq!(r.pairs().last(), Some(("dept", NULL_GLYPH)));
        assert_eq!(r.to_csv_line(), "3,Andi,");
    }
}
