/// Hand the opaque MusicXML document to the notation renderer bundled with
/// the page assets. The game never looks inside the document.
pub(super) fn render_score_script(score_xml: &str) -> String {
    let payload = serde_json::to_string(score_xml).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"(function() {{
            const el = document.getElementById("score-pane");
            if (!el || !window.notation) return;
            window.notation.load(el, {payload}).then(() => window.notation.render(el));
        }})();"#
    )
}

/// Fire-and-forget playback of a correct-answer cue. Playback failures are
/// swallowed in the page, matching the rest of the audio path.
pub(super) fn play_cue_script(cue: &str) -> String {
    let payload = serde_json::to_string(cue).unwrap_or_else(|_| "\"\"".to_string());
    format!("new Audio({payload}).play().catch(() => {{}});")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_xml_is_embedded_as_a_js_string() {
        let script = render_score_script(r#"<score-partwise version="4.0"/>"#);
        assert!(script.contains(r#""<score-partwise version=\"4.0\"/>""#));
    }

    #[test]
    fn cue_path_is_quoted() {
        let script = play_cue_script("/audio/marimba-c4.mp3");
        assert!(script.contains("\"/audio/marimba-c4.mp3\""));
    }
}
