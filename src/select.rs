use crate::config::RunConfig;
use crate::error::AppError;
use crate::prompt::Prompter;
use crate::timestamp::parse_timestamp;
use comfy_table::{Table, presets::UTF8_FULL};
use log::debug;
use std::path::Path;

const START_LABEL: &str = "    clip start: ";
const END_LABEL: &str = "      clip end: ";

/// Accepted clip range in whole seconds, with `0 <= start < duration` and
/// `start < end <= duration` guaranteed by the selection process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub start: u64,
    pub end: u64,
}

impl ClipRange {
    pub fn length(self) -> u64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitStart,
    AwaitEnd,
    Confirm,
}

/// Determine the clip range for one track.
///
/// With `--use-defaults` the configured range is resolved against the track
/// duration and validated, with no prompting. Otherwise an explicit state
/// machine walks AwaitStart → AwaitEnd → Confirm; rejecting the confirmation
/// restarts the loop, and malformed or out-of-range input re-prompts the
/// current state inline without ever escalating.
pub fn select_range(
    config: &RunConfig,
    track: &str,
    duration: u64,
    out_path: &Path,
    prompter: &mut dyn Prompter,
) -> Result<ClipRange, AppError> {
    let mut start = config.clip_start;
    let mut end = config.clip_end.resolve(start, duration);
    let mut end_relative = config.clip_end.is_relative();

    if config.use_defaults {
        let range = ClipRange { start, end };
        return validate_range(range, duration).map_err(AppError::Validation);
    }

    let mut state = State::AwaitStart;
    loop {
        match state {
            State::AwaitStart => {
                let shown = start.to_string();
                let input = prompter.ask(START_LABEL, &shown)?;
                if input.is_empty() {
                    // The configured default can itself sit past the track;
                    // accepting it would leave AwaitEnd with no valid input.
                    if start < duration {
                        state = State::AwaitEnd;
                    } else {
                        inline_error(START_LABEL, &shown, "timestamp exceeds track duration");
                    }
                    continue;
                }
                match parse_timestamp(&input, Some(0), None) {
                    None => inline_error(START_LABEL, &input, "invalid timestamp"),
                    Some(s) if s >= duration => {
                        inline_error(START_LABEL, &input, "timestamp exceeds track duration");
                    }
                    Some(s) => {
                        // Keep the clip length until the end is edited
                        // explicitly: the retained end moves with the start.
                        end = s + end.saturating_sub(start);
                        start = s;
                        state = State::AwaitEnd;
                    }
                }
            }
            State::AwaitEnd => {
                let shown = if end_relative {
                    format!("+{}", end.saturating_sub(start))
                } else {
                    end.to_string()
                };
                let input = prompter.ask(END_LABEL, &shown)?;
                if input.is_empty() {
                    // Accepting the retained value still has to leave a
                    // trim-safe range; a stale one re-prompts like bad input.
                    match validate_range(ClipRange { start, end }, duration) {
                        Ok(_) => state = State::Confirm,
                        Err(message) => inline_error(END_LABEL, &shown, &message),
                    }
                    continue;
                }
                match parse_timestamp(&input, Some(start), Some(duration)) {
                    None => inline_error(END_LABEL, &input, "invalid timestamp"),
                    Some(e) if e <= start => {
                        inline_error(END_LABEL, &input, "end must lie after clip start");
                    }
                    Some(e) if e > duration => {
                        inline_error(END_LABEL, &input, "timestamp exceeds track duration");
                    }
                    Some(e) => {
                        end = e;
                        end_relative = input.starts_with('+');
                        state = State::Confirm;
                    }
                }
            }
            State::Confirm => {
                let range = ClipRange { start, end };
                debug!("proposed range for `{track}`: {}..{}", range.start, range.end);
                if config.assume_yes {
                    return Ok(range);
                }
                print_summary(track, duration, range, out_path);
                let answer = prompter.ask("Create this clip? [y/N] ", "")?;
                if answer.eq_ignore_ascii_case("y") {
                    return Ok(range);
                }
                state = State::AwaitStart;
            }
        }
    }
}

fn validate_range(range: ClipRange, duration: u64) -> Result<ClipRange, String> {
    if range.start >= duration {
        return Err(format!(
            "clip start ({}) exceeds track duration ({duration})",
            range.start
        ));
    }
    if range.end <= range.start || range.end > duration {
        return Err(format!(
            "clip end ({}) must lie after start ({}) and within the track ({duration})",
            range.end, range.start
        ));
    }
    Ok(range)
}

/// Underline the offending input with carets, aligned under the prompt.
fn inline_error(label: &str, input: &str, message: &str) {
    println!(
        "{}{} {message}",
        " ".repeat(label.chars().count()),
        "^".repeat(input.chars().count().max(1))
    );
}

fn print_summary(track: &str, duration: u64, range: ClipRange, out_path: &Path) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Parameter", "Value"]);
    table
        .add_row(vec!["Track", track])
        .add_row(vec!["Track length", &format!("{duration} s")])
        .add_row(vec!["Clip start", &format!("{} s", range.start)])
        .add_row(vec!["Clip end", &format!("{} s", range.end)])
        .add_row(vec!["Clip length", &format!("{} s", range.length())])
        .add_row(vec!["Output", &out_path.display().to_string()]);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::testing::ScriptedPrompter;
    use crate::timestamp::EndSpec;
    use std::path::PathBuf;

    fn config(start: u64, end: EndSpec, use_defaults: bool, assume_yes: bool) -> RunConfig {
        RunConfig {
            query: "song".into(),
            out_dir: PathBuf::from("."),
            out_file: None,
            downloader_args: Vec::new(),
            composer_args: Vec::new(),
            clip_start: start,
            clip_end: end,
            cover_image: None,
            use_defaults,
            assume_yes,
        }
    }

    fn select(
        config: &RunConfig,
        duration: u64,
        prompter: &mut ScriptedPrompter,
    ) -> Result<ClipRange, AppError> {
        select_range(config, "track", duration, Path::new("out.mp4"), prompter)
    }

    #[test]
    fn defaults_mode_never_prompts() {
        let config = config(0, EndSpec::Relative(15), true, false);
        let mut prompter = ScriptedPrompter::new([]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 0, end: 15 });
        assert!(prompter.labels.is_empty());
    }

    #[test]
    fn defaults_mode_rejects_out_of_range_configuration() {
        let config = config(300, EndSpec::Relative(15), true, false);
        let mut prompter = ScriptedPrompter::new([]);
        let err = select(&config, 200, &mut prompter).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn sentinel_end_resolves_to_track_duration() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["10", "-1", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 10, end: 200 });
        assert!(prompter.exhausted());
    }

    #[test]
    fn empty_input_accepts_the_shown_defaults() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["", "", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 0, end: 15 });
    }

    #[test]
    fn moving_the_start_preserves_clip_length() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["30", "", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 30, end: 45 });
        assert_eq!(range.length(), 15);
    }

    #[test]
    fn invalid_start_reprompts_the_same_state() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["abc", "1:2:3:4", "10", "", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 10, end: 25 });
        // three start prompts, one end prompt, one confirmation
        assert_eq!(prompter.labels.len(), 5);
    }

    #[test]
    fn start_beyond_duration_is_rejected() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["500", "10", "", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 10, end: 25 });
    }

    #[test]
    fn end_at_or_before_start_is_rejected() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["20", "5", "20", "+10", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 20, end: 30 });
    }

    #[test]
    fn end_beyond_duration_is_rejected() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["", "10:00", "3:00", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 0, end: 180 });
    }

    #[test]
    fn hour_segments_parse_in_the_prompt() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["1:00:00", "+2:49", "y"]);
        let range = select(&config, 19098, &mut prompter).unwrap();
        assert_eq!(
            range,
            ClipRange {
                start: 3600,
                end: 3769
            }
        );
    }

    #[test]
    fn rejected_confirmation_restarts_from_await_start() {
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["10", "", "n", "20", "", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 20, end: 35 });
    }

    #[test]
    fn auto_confirm_skips_the_confirmation_prompt() {
        let config = config(0, EndSpec::Relative(15), false, true);
        let mut prompter = ScriptedPrompter::new(["10", ""]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 10, end: 25 });
        assert!(prompter.exhausted());
    }

    #[test]
    fn out_of_range_default_start_cannot_be_accepted() {
        // A configured start past the 200 s track: accepting it with enter
        // must re-prompt AwaitStart, not wedge AwaitEnd where no end could
        // ever satisfy start < end <= duration.
        let config = config(300, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["", "10", "", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(range, ClipRange { start: 10, end: 25 });
        // two start prompts, one end prompt, one confirmation
        assert_eq!(prompter.labels.len(), 4);
    }

    #[test]
    fn stale_shifted_end_cannot_be_accepted() {
        // Moving the start to 190 drags the retained end to 205, past the
        // 200 s track; accepting it must re-prompt instead of clamping.
        let config = config(0, EndSpec::Relative(15), false, false);
        let mut prompter = ScriptedPrompter::new(["190", "", "-1", "y"]);
        let range = select(&config, 200, &mut prompter).unwrap();
        assert_eq!(
            range,
            ClipRange {
                start: 190,
                end: 200
            }
        );
    }

    #[test]
    fn accepted_ranges_always_satisfy_the_trim_invariant() {
        let duration = 200;
        let scripts: [[&str; 3]; 4] = [
            ["", "", "y"],
            ["199", "-1", "y"],
            ["0", "+1", "y"],
            ["2:49", "", "y"],
        ];
        for script in scripts {
            let config = config(0, EndSpec::Relative(15), false, false);
            let mut prompter = ScriptedPrompter::new(script);
            let range = select(&config, duration, &mut prompter).unwrap();
            assert!(range.start < duration);
            assert!(range.start < range.end);
            assert!(range.end <= duration);
        }
    }
}
