//! HTML fragment formatting for result panels.
//!
//! Everything here is pure string work: no panel knows how it is displayed,
//! only what markup it contains. `html_to_text` turns those fragments back
//! into terminal text.

use protein_explorer_api::{DrugAssociations, DrugRow, FunctionData, StructureData};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ACTIVITY_VALUE: LazyLock<Regex> = LazyLock::new(|| regex(r"=\s*([\d.]+)"));
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| regex(r"```(?:markdown)?"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| regex(r"(?m)^#{1,6}\s+(.*?)$"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| regex(r"\*\*(.*?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| regex(r"\*(.*?)\*"));
static WORD_START: LazyLock<Regex> = LazyLock::new(|| regex(r"\b\w"));
static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?i)<br\s*/?>|</p>|</h\d>|</tr>|</div>"));
static CELL_END: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)</t[dh]>"));
static TAG: LazyLock<Regex> = LazyLock::new(|| regex(r"<[^>]*>"));
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| regex(r"\n[ \t]*(\n[ \t]*)+"));

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("format patterns are valid static regex patterns")
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Spinner block shown while a panel loads.
pub fn loading(message: &str) -> String {
    format!(
        "<div class=\"loading\"><div class=\"spinner\"></div><p>{}</p></div>",
        escape_html(message)
    )
}

pub fn error(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", escape_html(message))
}

pub fn info(message: &str) -> String {
    format!("<p class=\"info\">{}</p>", escape_html(message))
}

/// Model confidence badge: above 0.9 is high, above 0.7 medium, else low.
pub fn format_confidence(confidence: f64) -> String {
    if confidence > 0.9 {
        format!("<span class=\"confidence high\">🟢 High confidence ({confidence:.2})</span>")
    } else if confidence > 0.7 {
        format!("<span class=\"confidence medium\">🟡 Medium confidence ({confidence:.2})</span>")
    } else {
        format!("<span class=\"confidence low\">🔴 Low confidence ({confidence:.2})</span>")
    }
}

/// Convert the backend's markdown-ish analysis into paragraphs.
pub fn format_analysis_text(text: Option<&str>) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return "No analysis available".to_string();
    };

    let text = CODE_FENCE.replace_all(text, "");
    let text = escape_html(&text);
    let text = HEADING.replace_all(&text, "<h4>${1}</h4>");
    let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
    let text = ITALIC.replace_all(&text, "<em>${1}</em>");
    let text = text.replace("\n\n", "</p><p>").replace('\n', "<br>");

    format!("<p>{text}</p>")
}

/// Pull the numeric part out of an activity string such as `"IC50 = 12.5"`.
pub fn extract_activity_value(activity: &str) -> Option<String> {
    ACTIVITY_VALUE
        .captures(activity)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split an embedded activity value into its own `activity_value` column.
///
/// Rows without any value get `"0.0"` so the column is never blank.
pub fn normalize_drug(drug: &DrugRow) -> DrugRow {
    let mut updated = drug.clone();
    let activity = drug.get("activity").map(value_text).unwrap_or_default();
    let has_value = drug
        .get("activity_value")
        .is_some_and(|v| !value_text(v).is_empty());

    if has_value {
        return updated;
    }

    if !activity.is_empty()
        && let Some(value) = extract_activity_value(&activity)
    {
        let stripped = ACTIVITY_VALUE.replace(&activity, "").trim().to_string();
        updated.insert("activity".to_string(), Value::String(stripped));
        updated.insert("activity_value".to_string(), Value::String(value));
    } else {
        updated.insert(
            "activity_value".to_string(),
            Value::String("0.0".to_string()),
        );
    }
    updated
}

/// Render rows as a table whose columns are the union of all row keys.
///
/// An `activity_value` column replaces `activity` when present, and is
/// synthesized from `activity` when only that exists.
pub fn data_table(rows: &[DrugRow]) -> String {
    if rows.is_empty() {
        return "<p>No data available</p>".to_string();
    }

    let mut keys: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
    }
    if !keys.contains(&"activity_value") && keys.contains(&"activity") {
        keys.push("activity_value");
    }
    let has_value_column = keys.contains(&"activity_value");
    let columns: Vec<&str> = keys
        .into_iter()
        .filter(|key| *key != "activity" || !has_value_column)
        .collect();

    let mut html = String::from("<table class=\"data-table\"><thead><tr>");
    for column in &columns {
        html.push_str(&format!("<th>{}</th>", escape_html(&header_title(column))));
    }
    html.push_str("</tr></thead><tbody>");

    for row in rows {
        html.push_str("<tr>");
        for column in &columns {
            let text = if *column == "activity_value" && !row.contains_key("activity_value") {
                row.get("activity")
                    .map(value_text)
                    .and_then(|activity| extract_activity_value(&activity))
                    .unwrap_or_default()
            } else {
                row.get(*column).map(value_text).unwrap_or_default()
            };
            html.push_str(&format!("<td>{}</td>", escape_html(&text)));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// `target_chembl_id` -> `Target Chembl Id`
pub fn header_title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures| caps[0].to_uppercase())
        .into_owned()
}

/// Display text of a JSON cell; falsy values render empty.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// UniProt details block plus the structure container beside it.
pub fn protein_details(function: &FunctionData, structure_html: &str) -> String {
    let or_unknown = |v: &Option<String>| {
        escape_html(
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown"),
        )
    };
    let description = function
        .function
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("Function information not available");

    format!(
        "<div class=\"info-structure-container\">\
         <div class=\"protein-details\"><div>\
         <p><strong>UniProt ID:</strong> {id}</p>\
         <p><strong>Protein Name:</strong> {name}</p>\
         <p><strong>Gene Names:</strong> {genes}</p>\
         <p><strong>Organism:</strong> {organism}</p>\
         </div><div class=\"function-description\">\
         <h4>Biological Function:</h4><p>{description}</p>\
         </div></div>{structure_html}</div>",
        id = or_unknown(&function.id),
        name = or_unknown(&function.name),
        genes = escape_html(&function.gene_names.join(", ")),
        organism = or_unknown(&function.organism),
        description = escape_html(description),
    )
}

/// Structure container with separate metadata and viewer areas.
pub fn structure_container(metadata_html: &str, viewer_html: &str) -> String {
    format!(
        "<div id=\"structure-container\" class=\"structure-container\">\
         <div class=\"structure-metadata\">{metadata_html}</div>\
         <div id=\"structure-viewer\" class=\"structure-viewer-container\">{viewer_html}</div>\
         </div>"
    )
}

pub fn structure_loading() -> String {
    structure_container("<h4>3D Structure</h4><p>Loading protein structure...</p>", "")
}

/// Structure block for a successful structure lookup.
pub fn structure_found(data: &StructureData, pdb: &str) -> String {
    let mut metadata = format!(
        "<h4>Structure Information</h4><p><strong>UniProt ID:</strong> {}</p>",
        escape_html(
            data.uniprot_id
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown")
        )
    );
    if let Some(confidence) = data.confidence() {
        metadata.push_str(&format!(
            "<p><strong>Model Confidence:</strong> {}</p>",
            format_confidence(confidence)
        ));
    }

    let atoms = pdb
        .lines()
        .filter(|line| line.starts_with("ATOM") || line.starts_with("HETATM"))
        .count();
    let viewer = format!(
        "<div class=\"structure-placeholder\"><h4>3D Structure Available</h4>\
         <p>Model with {atoms} atom records; open in a molecular viewer to inspect it.</p></div>"
    );

    structure_container(&metadata, &viewer)
}

pub fn structure_unavailable() -> String {
    structure_container(
        "<h4>Structure Information</h4><p class=\"error\">Could not retrieve 3D structure data</p>",
        "<div class=\"structure-placeholder\"><h4>Structure Not Available</h4>\
         <p>No 3D structure data could be found for this protein</p></div>",
    )
}

pub fn analysis_content(text: Option<&str>) -> String {
    format!(
        "<div class=\"analysis-content\">{}</div>",
        format_analysis_text(text)
    )
}

/// Target header followed by the normalized drug table.
pub fn drugs_content(associations: &DrugAssociations) -> String {
    let or_unknown = |v: &Option<String>| {
        escape_html(
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("Unknown"),
        )
    };
    let drugs: Vec<DrugRow> = associations.drugs.iter().map(normalize_drug).collect();

    format!(
        "<h4>ChEMBL Target ID: {}</h4><h4>Target Name: {}</h4><div id=\"drugs-table\">{}</div>",
        or_unknown(&associations.target_chembl_id),
        or_unknown(&associations.target_name),
        data_table(&drugs)
    )
}

/// Strip markup for terminal display.
///
/// Block ends become newlines, table cells are separated by ` | `, and the
/// entities produced by [`escape_html`] are decoded.
pub fn html_to_text(html: &str) -> String {
    let text = BLOCK_END.replace_all(html, "\n");
    let text = CELL_END.replace_all(&text, " | ");
    let text = TAG.replace_all(&text, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let text = BLANK_LINES.replace_all(&text, "\n");

    text.lines()
        .map(|line| line.trim().trim_end_matches('|').trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
