use crate::model::WeatherUpdatePayload;

use super::{SectionMarkers, stamp};

const CELL_MARKUP_TOKENS: &[&str] = &["<table", "<tr", "<td", "<th"];
const BLOCK_CONTAINER_TOKENS: &[&str] = &["<div", "<p>", "<p ", "<span"];

/// Structural family of an existing section.
///
/// Classification checks the families in declaration order and stops at the
/// first match, so a section carrying both HTML cells and pipe rows is
/// `CellMarkup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionFormat {
    CellMarkup,
    BlockContainer,
    Table,
    PlainLines,
}

impl SectionFormat {
    /// Classify the text between the markers.
    pub fn detect(inner: &str) -> Self {
        let lower = inner.to_ascii_lowercase();

        if CELL_MARKUP_TOKENS.iter().any(|t| lower.contains(t)) {
            SectionFormat::CellMarkup
        } else if BLOCK_CONTAINER_TOKENS.iter().any(|t| lower.contains(t)) {
            SectionFormat::BlockContainer
        } else if is_markdown_table(inner) {
            SectionFormat::Table
        } else {
            SectionFormat::PlainLines
        }
    }
}

fn is_pipe_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_separator_row(line: &str) -> bool {
    let row = line.trim();
    row.starts_with('|')
        && row.contains('-')
        && row.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// A header row followed by a separator row, both pipe-led.
fn is_markdown_table(inner: &str) -> bool {
    let mut rows = inner.lines().filter(|l| is_pipe_row(l));
    match (rows.next(), rows.next()) {
        (Some(header), Some(separator)) => !is_separator_row(header) && is_separator_row(separator),
        _ => false,
    }
}

/// Regenerates a section in the family it already uses.
#[derive(Debug, Clone, Default)]
pub struct SectionRenderer {
    markers: SectionMarkers,
}

impl SectionRenderer {
    pub fn new(markers: SectionMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &SectionMarkers {
        &self.markers
    }

    /// Render a replacement for `current_section` (markers included). Both
    /// markers are always present in the result.
    pub fn render(&self, payload: &WeatherUpdatePayload, current_section: &str) -> String {
        let inner = self.markers.inner(current_section);

        match SectionFormat::detect(inner) {
            SectionFormat::CellMarkup => self.wrap_keeping_stamp(&cell_markup(payload), inner),
            SectionFormat::BlockContainer => {
                self.wrap_keeping_stamp(&block_container(payload), inner)
            }
            SectionFormat::Table => format!(
                "{}{}{}",
                self.markers.start,
                table_rows(payload, inner),
                self.markers.end
            ),
            SectionFormat::PlainLines => self.wrap_keeping_stamp(&plain_lines(payload), inner),
        }
    }

    /// Templates replace the whole body, so a refresh marker that lived inside
    /// the old section is appended on its own line to survive the rewrite.
    fn wrap_keeping_stamp(&self, body: &str, old_inner: &str) -> String {
        match stamp::find_marker(old_inner) {
            Some(marker) => self.markers.wrap(&format!("{body}\n{marker}")),
            None => self.markers.wrap(body),
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn cell_markup(payload: &WeatherUpdatePayload) -> String {
    let description = escape_html(payload.description());
    format!(
        "<table>\n  <tr>\n    <td align=\"center\"><img src=\"{url}\" alt=\"{description}\" width=\"64\"/></td>\n    <td>\n      <b>{description}</b><br/>\n      Temperature: {temp}°C<br/>\n      Humidity: {humidity}%<br/>\n      Sunrise: {sunrise} · Sunset: {sunset}\n    </td>\n  </tr>\n</table>",
        url = payload.icon().image_url(),
        temp = payload.temperature_c(),
        humidity = payload.humidity_pct(),
        sunrise = escape_html(payload.sunrise_local().as_str()),
        sunset = escape_html(payload.sunset_local().as_str()),
    )
}

fn block_container(payload: &WeatherUpdatePayload) -> String {
    let description = escape_html(payload.description());
    format!(
        "<div align=\"center\">\n  <img src=\"{url}\" alt=\"{description}\" width=\"64\"/>\n  <p><b>{description}</b> · {temp}°C · Humidity {humidity}%</p>\n  <p>Sunrise {sunrise} · Sunset {sunset}</p>\n</div>",
        url = payload.icon().image_url(),
        temp = payload.temperature_c(),
        humidity = payload.humidity_pct(),
        sunrise = escape_html(payload.sunrise_local().as_str()),
        sunset = escape_html(payload.sunset_local().as_str()),
    )
}

fn plain_lines(payload: &WeatherUpdatePayload) -> String {
    format!(
        "Weather: {description}\nTemperature: {temp}°C\nHumidity: {humidity}%\nSunrise: {sunrise}\nSunset: {sunset}\nIcon: ![{description}]({url})",
        description = payload.description(),
        temp = payload.temperature_c(),
        humidity = payload.humidity_pct(),
        sunrise = payload.sunrise_local(),
        sunset = payload.sunset_local(),
        url = payload.icon().image_url(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Icon,
    Description,
    Temperature,
    Humidity,
    Sunrise,
    Sunset,
    Other,
}

/// Column order used when a header cell has no recognisable label.
const DEFAULT_COLUMNS: [Column; 6] = [
    Column::Icon,
    Column::Description,
    Column::Temperature,
    Column::Humidity,
    Column::Sunrise,
    Column::Sunset,
];

impl Column {
    fn from_header(label: &str, position: usize) -> Self {
        let label = label.to_lowercase();
        if label.contains("icon") {
            Column::Icon
        } else if label.contains("sunrise") {
            Column::Sunrise
        } else if label.contains("sunset") {
            Column::Sunset
        } else if label.contains("temp") {
            Column::Temperature
        } else if label.contains("humid") {
            Column::Humidity
        } else if ["weather", "condition", "description", "sky"]
            .iter()
            .any(|k| label.contains(k))
        {
            Column::Description
        } else {
            DEFAULT_COLUMNS.get(position).copied().unwrap_or(Column::Other)
        }
    }

    fn value(self, payload: &WeatherUpdatePayload) -> String {
        match self {
            Column::Icon => format!(
                "![{}]({})",
                payload.description(),
                payload.icon().image_url()
            ),
            Column::Description => payload.description().to_string(),
            Column::Temperature => format!("{}°C", payload.temperature_c()),
            Column::Humidity => format!("{}%", payload.humidity_pct()),
            Column::Sunrise => payload.sunrise_local().to_string(),
            Column::Sunset => payload.sunset_local().to_string(),
            Column::Other => String::new(),
        }
    }
}

fn header_cells(header: &str) -> Vec<&str> {
    let row = header.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(str::trim).collect()
}

fn data_row(payload: &WeatherUpdatePayload, header: &str) -> String {
    let indent = &header[..header.len() - header.trim_start().len()];
    let cells: Vec<String> = header_cells(header)
        .iter()
        .enumerate()
        .map(|(i, label)| {
            Column::from_header(label, i)
                .value(payload)
                .replace('|', "\\|")
        })
        .collect();
    format!("{indent}| {} |", cells.join(" | "))
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let content = line.trim_end_matches(['\n', '\r']);
    (content, &line[content.len()..])
}

/// Keep every line of `inner` except the data rows, which collapse into one
/// freshly rendered row placed right after the separator.
fn table_rows(payload: &WeatherUpdatePayload, inner: &str) -> String {
    let mut out = String::with_capacity(inner.len() + 128);
    let mut header: Option<&str> = None;
    let mut pipe_rows = 0usize;
    let mut row_written = false;

    for line in inner.split_inclusive('\n') {
        let (content, ending) = split_line_ending(line);

        if is_pipe_row(content) {
            pipe_rows += 1;
            match pipe_rows {
                1 => {
                    header = Some(content);
                    out.push_str(line);
                }
                2 => out.push_str(line),
                _ if !row_written => {
                    out.push_str(&data_row(payload, header.unwrap_or(content)));
                    out.push_str(ending);
                    row_written = true;
                }
                _ => {}
            }
            continue;
        }

        if pipe_rows >= 2 && !row_written {
            out.push_str(&data_row(payload, header.unwrap_or_default()));
            out.push('\n');
            row_written = true;
        }
        out.push_str(line);
    }

    if !row_written {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&data_row(payload, header.unwrap_or_default()));
        out.push('\n');
    }

    out
}
