//! Interactive prompts for answers not given on the command line
//!
//! Generic over reader/writer so tests can script a session. Prompts read
//! whatever stdin is, so piped answers work the same as typed ones.

use std::io::{self, BufRead, Write};

use crate::logic::encoding::{EncodingTables, LabelCodec};
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::answers::{
    DRAINED_PROMPT, FRIENDS_CIRCLE, GOING_OUTSIDE, POST_FREQUENCY, SOCIAL_EVENTS,
    STAGE_FEAR_PROMPT, TIME_ALONE,
};
use crate::logic::features::{NumericQuestion, RawAnswers};

/// Answers supplied up front (command-line flags). `None` means ask.
#[derive(Debug, Clone, Default)]
pub struct GivenAnswers {
    pub time_alone: Option<u32>,
    pub social_events: Option<u32>,
    pub going_outside: Option<u32>,
    pub friends: Option<u32>,
    pub posts: Option<u32>,
    pub stage_fear: Option<String>,
    pub drained: Option<String>,
}

/// How to fill an answer that was not given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAnswers {
    /// Ask on `input`, terminal or not
    Prompt,
    /// Take the control's default, with a warning
    UseDefaults,
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim().to_string())
}

/// Ask until the answer is within bounds. Empty answer takes the default.
pub fn ask_number<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &NumericQuestion,
) -> io::Result<u32> {
    loop {
        write!(
            output,
            "{} [{}-{}, default {}]: ",
            question.prompt, question.min, question.max, question.default
        )?;
        output.flush()?;

        let line = read_line(input)?;
        if line.is_empty() {
            return Ok(question.default);
        }

        match line.parse::<u32>() {
            Ok(value) if question.contains(value) => return Ok(value),
            _ => writeln!(
                output,
                "  Please enter a whole number from {} to {}.",
                question.min, question.max
            )?,
        }
    }
}

/// Ask for one of `options`, by label (any case) or 1-based number.
/// Empty answer takes the first option.
pub fn ask_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    options: &[String],
) -> io::Result<String> {
    if options.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "no options to choose from"));
    }

    loop {
        let listed: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}) {}", i + 1, o))
            .collect();
        write!(output, "{} [{}]: ", prompt, listed.join("  "))?;
        output.flush()?;

        let line = read_line(input)?;
        if line.is_empty() {
            return Ok(options[0].clone());
        }

        if let Some(found) = options.iter().find(|o| o.eq_ignore_ascii_case(&line)) {
            return Ok(found.clone());
        }
        if let Some(found) = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i))
        {
            return Ok(found.clone());
        }

        writeln!(output, "  Please choose one of: {}.", options.join(", "))?;
    }
}

fn read_failed(err: io::Error) -> PipelineError {
    PipelineError::InvalidInput(format!("could not read answer: {}", err))
}

fn numeric_answer<R: BufRead, W: Write>(
    given: Option<u32>,
    question: &NumericQuestion,
    missing: MissingAnswers,
    input: &mut R,
    output: &mut W,
) -> PipelineResult<u32> {
    match (given, missing) {
        (Some(value), _) => question.check(value),
        (None, MissingAnswers::Prompt) => ask_number(input, output, question).map_err(read_failed),
        (None, MissingAnswers::UseDefaults) => {
            log::warn!("No answer for {}, using default {}", question.key, question.default);
            Ok(question.default)
        }
    }
}

/// A given label must be one of the codec's options (any case)
fn choice_answer<R: BufRead, W: Write>(
    given: Option<&str>,
    codec: &LabelCodec,
    prompt: &str,
    missing: MissingAnswers,
    input: &mut R,
    output: &mut W,
) -> PipelineResult<String> {
    let options: Vec<String> = codec.labels().map(str::to_string).collect();

    match (given, missing) {
        (Some(value), _) => options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(value))
            .cloned()
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!(
                    "'{}' is not a valid {} answer (expected one of: {})",
                    value,
                    codec.name(),
                    options.join(", ")
                ))
            }),
        (None, MissingAnswers::Prompt) => ask_choice(input, output, prompt, &options).map_err(read_failed),
        (None, MissingAnswers::UseDefaults) => {
            let first = options.first().cloned().ok_or_else(|| {
                PipelineError::Configuration(format!("{} has no options", codec.name()))
            })?;
            log::warn!("No answer for {}, using default {}", codec.name(), first);
            Ok(first)
        }
    }
}

/// Complete the answers: flags first, then prompts (or defaults).
/// Choice options come from the loaded tables.
pub fn collect_answers<R: BufRead, W: Write>(
    given: &GivenAnswers,
    tables: &EncodingTables,
    missing: MissingAnswers,
    input: &mut R,
    output: &mut W,
) -> PipelineResult<RawAnswers> {
    Ok(RawAnswers {
        time_alone: numeric_answer(given.time_alone, &TIME_ALONE, missing, input, output)?,
        social_event_attendance: numeric_answer(given.social_events, &SOCIAL_EVENTS, missing, input, output)?,
        going_outside: numeric_answer(given.going_outside, &GOING_OUTSIDE, missing, input, output)?,
        friends_circle_size: numeric_answer(given.friends, &FRIENDS_CIRCLE, missing, input, output)?,
        post_frequency: numeric_answer(given.posts, &POST_FREQUENCY, missing, input, output)?,
        stage_fear: choice_answer(
            given.stage_fear.as_deref(),
            tables.stage_fear(),
            STAGE_FEAR_PROMPT,
            missing,
            input,
            output,
        )?,
        drained_after_socializing: choice_answer(
            given.drained.as_deref(),
            tables.drained(),
            DRAINED_PROMPT,
            missing,
            input,
            output,
        )?,
    })
}
