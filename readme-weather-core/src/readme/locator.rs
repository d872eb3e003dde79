use std::ops::Range;

use super::SectionMarkers;

/// Byte range of the first marker-delimited section, markers included.
pub fn section_span(text: &str, markers: &SectionMarkers) -> Option<Range<usize>> {
    if markers.start.is_empty() || markers.end.is_empty() {
        return None;
    }

    let start = text.find(markers.start.as_str())?;
    let body = start + markers.start.len();
    let end = body + text[body..].find(markers.end.as_str())? + markers.end.len();

    Some(start..end)
}

/// The first managed section of `text`, or `""` when the markers are absent.
pub fn locate<'a>(text: &'a str, markers: &SectionMarkers) -> &'a str {
    section_span(text, markers).map_or("", |span| &text[span])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_section_with_markers() {
        let markers = SectionMarkers::default();
        let text = "# Title\n<!--START-->Pending<!--END-->\nfooter";
        assert_eq!(locate(text, &markers), "<!--START-->Pending<!--END-->");
        assert_eq!(section_span(text, &markers), Some(8..37));
    }

    #[test]
    fn empty_section_is_still_a_section() {
        let markers = SectionMarkers::default();
        assert_eq!(locate("<!--START--><!--END-->", &markers), "<!--START--><!--END-->");
    }

    #[test]
    fn missing_markers_yield_empty_string() {
        let markers = SectionMarkers::default();
        assert_eq!(locate("no markers here", &markers), "");
        assert_eq!(locate("<!--START--> only start", &markers), "");
        assert_eq!(locate("only end <!--END-->", &markers), "");
    }

    #[test]
    fn end_before_start_is_not_a_section() {
        let markers = SectionMarkers::default();
        assert_eq!(locate("<!--END--> x <!--START-->", &markers), "");
    }

    #[test]
    fn first_section_wins() {
        let markers = SectionMarkers::default();
        let text = "<!--START-->a<!--END--> <!--START-->b<!--END-->";
        assert_eq!(locate(text, &markers), "<!--START-->a<!--END-->");
    }

    #[test]
    fn empty_markers_never_match() {
        let markers = SectionMarkers::new("", "");
        assert_eq!(locate("anything", &markers), "");
    }
}
