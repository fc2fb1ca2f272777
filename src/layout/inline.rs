use crate::error::RenderError;
use crate::fonts::{Fonts, Weight};

use super::{PlacedText, TextStyle};

/// A piece of a line drawn in a single weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
}

impl StyledRun {
    fn new(text: impl Into<String>, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
        }
    }
}

/// Split a line at paired `**` markers, left to right, shortest span first.
/// A `**` with no closing partner is kept as literal text.
pub fn parse_styled_runs(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find("**") {
        let inner = &rest[open + 2..];
        let Some(close) = inner.find("**") else {
            break;
        };
        push_text(&mut runs, &rest[..open], false);
        push_text(&mut runs, &inner[..close], true);
        rest = &inner[close + 2..];
    }
    push_text(&mut runs, rest, false);
    if runs.is_empty() {
        runs.push(StyledRun::new("", false));
    }
    runs
}

/// Append text, merging into the last run when the weight matches. Empty text is dropped.
fn push_text(runs: &mut Vec<StyledRun>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => runs.push(StyledRun::new(text, bold)),
    }
}

fn run_weight(run: &StyledRun, base: Weight) -> Weight {
    if run.bold { Weight::Bold } else { base }
}

/// Draw runs left to right on one baseline starting at `x`. Each run is
/// measured with the same face and size it is drawn with. Returns the x
/// after the last run.
pub(crate) fn draw_runs(
    out: &mut Vec<PlacedText>,
    runs: &[StyledRun],
    x: f32,
    baseline: f32,
    base: TextStyle,
    fonts: &Fonts,
) -> Result<f32, RenderError> {
    let mut x = x;
    for run in runs {
        let style = TextStyle {
            weight: run_weight(run, base.weight),
            ..base
        };
        let advance = fonts.measure(&run.text, style.weight, style.size)?;
        out.push(PlacedText {
            x,
            baseline,
            text: run.text.clone(),
            style,
        });
        x += advance;
    }
    Ok(x)
}

/// Word-wrap styled runs to `max_width`.
/// No space is inserted between runs unless the preceding text ended with
/// whitespace or the new run starts with whitespace, so `**bold**,` stays
/// glued to its comma. A space joins the run that contained it.
pub(crate) fn wrap_runs(
    runs: &[StyledRun],
    base_weight: Weight,
    font_size: f32,
    max_width: f32,
    fonts: &Fonts,
) -> Result<Vec<Vec<StyledRun>>, RenderError> {
    let mut lines: Vec<Vec<StyledRun>> = Vec::new();
    let mut current: Vec<StyledRun> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_with_ws = false;
    let mut prev_space_w: f32 = 0.0;
    let mut prev_bold = false;

    for run in runs {
        let weight = run_weight(run, base_weight);
        let space_w = fonts.measure(" ", weight, font_size)?;
        let starts_with_ws = run.text.starts_with(char::is_whitespace);

        for (i, word) in run.text.split_whitespace().enumerate() {
            let ww = fonts.measure(word, weight, font_size)?;
            let need_space =
                !current.is_empty() && (i > 0 || starts_with_ws || prev_ended_with_ws);
            let space_is_ours = i > 0 || starts_with_ws;
            let proposed_x = match (need_space, space_is_ours) {
                (false, _) => current_x,
                (true, true) => current_x + space_w,
                (true, false) => current_x + prev_space_w,
            };

            if !current.is_empty() && proposed_x + ww > max_width {
                lines.push(std::mem::take(&mut current));
                current_x = 0.0;
            } else {
                if need_space {
                    let bold = if space_is_ours { run.bold } else { prev_bold };
                    push_text(&mut current, " ", bold);
                }
                current_x = proposed_x;
            }
            push_text(&mut current, word, run.bold);
            current_x += ww;
        }

        if !run.text.is_empty() {
            prev_ended_with_ws = run.text.ends_with(char::is_whitespace);
            prev_space_w = space_w;
            prev_bold = run.bold;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(Vec::new());
    }
    Ok(lines)
}

/// Wrap plain text (no markup) into lines of a single weight.
pub(crate) fn wrap_text(
    text: &str,
    weight: Weight,
    font_size: f32,
    max_width: f32,
    fonts: &Fonts,
) -> Result<Vec<String>, RenderError> {
    let runs = [StyledRun::new(text, false)];
    Ok(wrap_runs(&runs, weight, font_size, max_width, fonts)?
        .into_iter()
        .map(|line| line.into_iter().map(|r| r.text).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::layout::BODY_COLOR;

    fn helvetica() -> Fonts<'static> {
        static CONFIG: std::sync::OnceLock<FontConfig> = std::sync::OnceLock::new();
        Fonts::load(CONFIG.get_or_init(FontConfig::default)).expect("standard fonts")
    }

    fn body() -> TextStyle {
        TextStyle {
            weight: Weight::Regular,
            size: 12.0,
            color: BODY_COLOR,
        }
    }

    fn run(text: &str, bold: bool) -> StyledRun {
        StyledRun::new(text, bold)
    }

    #[test]
    fn plain_line_is_a_single_regular_run() {
        assert_eq!(
            parse_styled_runs("no markers here"),
            vec![run("no markers here", false)]
        );
        assert_eq!(parse_styled_runs(""), vec![run("", false)]);
    }

    #[test]
    fn bold_spans_alternate_with_plain_text() {
        assert_eq!(
            parse_styled_runs("A **B** C"),
            vec![run("A ", false), run("B", true), run(" C", false)]
        );
        assert_eq!(
            parse_styled_runs("**x** and **y**"),
            vec![run("x", true), run(" and ", false), run("y", true)]
        );
    }

    #[test]
    fn unmatched_markers_stay_literal() {
        assert_eq!(parse_styled_runs("a ** b"), vec![run("a ** b", false)]);
        assert_eq!(
            parse_styled_runs("**one** two **three"),
            vec![run("one", true), run(" two **three", false)]
        );
    }

    #[test]
    fn shortest_span_wins() {
        assert_eq!(
            parse_styled_runs("***a***"),
            vec![run("*a", true), run("*", false)]
        );
    }

    #[test]
    fn runs_partition_the_unmarked_line() {
        let line = "Lead **bold** mid **more bold** tail";
        let joined: String = parse_styled_runs(line).into_iter().map(|r| r.text).collect();
        assert_eq!(joined, line.replace("**", ""));
    }

    #[test]
    fn draw_advances_by_measured_width() {
        let fonts = helvetica();
        let mut out = Vec::new();
        let runs = parse_styled_runs("A **B** C");
        let end = draw_runs(&mut out, &runs, 50.0, 100.0, body(), &fonts).unwrap();

        assert_eq!(out.len(), 3);
        let expected: Vec<(&str, Weight)> = vec![
            ("A ", Weight::Regular),
            ("B", Weight::Bold),
            (" C", Weight::Regular),
        ];
        for (placed, (text, weight)) in out.iter().zip(expected) {
            assert_eq!(placed.text, text);
            assert_eq!(placed.style.weight, weight);
            assert_eq!(placed.baseline, 100.0);
        }

        let w_a = fonts.measure("A ", Weight::Regular, 12.0).unwrap();
        let w_b = fonts.measure("B", Weight::Bold, 12.0).unwrap();
        let w_c = fonts.measure(" C", Weight::Regular, 12.0).unwrap();
        assert!((out[1].x - (50.0 + w_a)).abs() < 1e-4);
        assert!((out[2].x - (50.0 + w_a + w_b)).abs() < 1e-4);
        assert!((end - (50.0 + w_a + w_b + w_c)).abs() < 1e-4);
        assert!((w_a - 11.34).abs() < 1e-3);
        assert!((w_b - 8.664).abs() < 1e-3);
    }

    #[test]
    fn bold_base_keeps_plain_runs_bold() {
        let fonts = helvetica();
        let mut out = Vec::new();
        let style = TextStyle {
            weight: Weight::Bold,
            ..body()
        };
        draw_runs(&mut out, &parse_styled_runs("Heading"), 0.0, 0.0, style, &fonts).unwrap();
        assert_eq!(out[0].style.weight, Weight::Bold);
    }

    #[test]
    fn wrap_keeps_lines_within_width() {
        let fonts = helvetica();
        let text = "the quick brown fox jumps over the lazy dog ".repeat(6);
        let lines = wrap_text(&text, Weight::Regular, 12.0, 120.0, &fonts).unwrap();
        assert!(lines.len() > 3);
        for line in &lines {
            let w = fonts.measure(line, Weight::Regular, 12.0).unwrap();
            assert!(w <= 120.0 + 1e-3, "{line:?} is {w}pt wide");
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text.trim_end());
    }

    #[test]
    fn wrap_preserves_weight_across_lines() {
        let fonts = helvetica();
        let runs = parse_styled_runs("intro **bold words that wrap onto a second line** outro");
        let lines = wrap_runs(&runs, Weight::Regular, 12.0, 100.0, &fonts).unwrap();
        assert!(lines.len() >= 3);
        assert_eq!(lines[0][0], run("intro ", false));
        assert!(lines[1].iter().all(|r| r.bold));
        let last = lines.last().unwrap();
        assert_eq!(last.last().unwrap(), &run(" outro", false));
    }

    #[test]
    fn wrap_does_not_split_glued_runs() {
        let fonts = helvetica();
        let lines = wrap_runs(&parse_styled_runs("**bold**, then"), Weight::Regular, 12.0, 500.0, &fonts)
            .unwrap();
        assert_eq!(lines, vec![vec![run("bold", true), run(", then", false)]]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let fonts = helvetica();
        let lines = wrap_text("a Pneumonoultramicroscopic b", Weight::Regular, 12.0, 40.0, &fonts).unwrap();
        assert_eq!(lines, vec!["a", "Pneumonoultramicroscopic", "b"]);
    }

    #[test]
    fn empty_text_wraps_to_one_empty_line() {
        let fonts = helvetica();
        assert_eq!(wrap_text("", Weight::Bold, 24.0, 300.0, &fonts).unwrap(), vec![""]);
    }
}
