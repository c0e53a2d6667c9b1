//! Interactive prompting over injectable input/output streams.
//!
//! Every question writes to `output` and reads one line from `input`. End of
//! input is reported as [`Aborted`] so callers can exit the way an interrupt
//! would.

use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::intake::{CustomerContact, CustomerIssue, normalize_optional};
use crate::io::answers::Answers;

/// Input ended while a question was pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("aborted by user")
    }
}

impl std::error::Error for Aborted {}

pub const YES_NO_RETRY: &str = "Please answer Y or n.";
pub const RATING_RANGE_RETRY: &str = "Please enter a rating between 1 and 10, or 0 for no rating.";
pub const RATING_INTEGER_RETRY: &str = "Please enter a valid integer rating, or 0 for no rating.";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a line.
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}").context("write prompt output")
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read answer")?;
        if read == 0 {
            return Err(Aborted.into());
        }
        Ok(line.trim().to_string())
    }

    /// Yes/no question; blank input picks `default`.
    pub fn yes_no(&mut self, question: &str, default: bool) -> Result<bool> {
        let suffix = if default { " (Y/n) " } else { " (y/N) " };
        loop {
            let answer = self.ask(&format!("{question}{suffix}"))?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say(YES_NO_RETRY)?,
            }
        }
    }

    /// Free-text question; blank input yields `None`.
    pub fn text(&mut self, prompt: &str, allow_skip: bool) -> Result<Option<String>> {
        let prompt = if allow_skip {
            format!("{prompt} (optional, press Enter to skip): ")
        } else {
            format!("{prompt}: ")
        };
        let answer = self.ask(&prompt)?;
        Ok(normalize_optional(Some(&answer)))
    }

    /// Ask for `label`, or confirm the value already on file.
    ///
    /// Without a current value the question is asked directly. With one, the
    /// customer confirms it (default yes) and is only asked again on "no".
    pub fn confirm_or_ask(
        &mut self,
        label: &str,
        current: Option<&str>,
        allow_skip: bool,
    ) -> Result<Option<String>> {
        let Some(current) = normalize_optional(current) else {
            return self.text(&format!("Please enter your {label}"), allow_skip);
        };
        if self.yes_no(&format!("Your {label} is {current}. Is this correct?"), true)? {
            return Ok(Some(current));
        }
        self.text(&format!("What is your {label}"), allow_skip)
    }

    /// Satisfaction rating from 1 to 10; 0 means no rating.
    pub fn rating(&mut self) -> Result<Option<u8>> {
        loop {
            let answer = self.ask(
                "On a scale of 1 to 10, how would you rate your experience with us? (Enter 0 for no rating) ",
            )?;
            match answer.parse::<i64>() {
                Ok(0) => return Ok(None),
                Ok(rating @ 1..=10) => return Ok(u8::try_from(rating).ok()),
                Ok(_) => self.say(RATING_RANGE_RETRY)?,
                Err(_) => self.say(RATING_INTEGER_RETRY)?,
            }
        }
    }

    /// Confirm or collect name, phone number and email into `answers`.
    pub fn collect_contact(&mut self, answers: &mut Answers) -> Result<CustomerContact> {
        let current = answers.contact();
        let name = self.confirm_or_ask("Name", current.name.as_deref(), false)?;
        if let Some(name) = &name {
            self.say(&format!("Hello, {name}!"))?;
        }
        let phone_number =
            self.confirm_or_ask("Phone number", current.phone_number.as_deref(), true)?;
        let email = self.confirm_or_ask("Email", current.email.as_deref(), true)?;

        let contact = CustomerContact {
            name,
            phone_number,
            email,
        };
        answers.set_contact(&contact);
        Ok(contact)
    }

    /// Offer to take feedback and, if accepted, collect the issue into
    /// `answers`.
    ///
    /// Returns `None` when the customer declines.
    pub fn collect_issue(&mut self, answers: &mut Answers) -> Result<Option<CustomerIssue>> {
        if !self.yes_no("Would you like to leave feedback?", false)? {
            debug!("customer declined to leave feedback");
            return Ok(None);
        }
        self.say("Thanks - please provide a bit more detail. You can skip optional questions.\n")?;

        let current = answers.issue();
        let issue = CustomerIssue {
            what_happened: self.confirm_or_ask(
                "What happened",
                current.what_happened.as_deref(),
                false,
            )?,
            when_happened: self.confirm_or_ask(
                "When did it happen",
                current.when_happened.as_deref(),
                true,
            )?,
            where_happened: self.confirm_or_ask(
                "Where did it happen",
                current.where_happened.as_deref(),
                true,
            )?,
            expecting_to_happen: self.confirm_or_ask(
                "What were you expecting to happen",
                current.expecting_to_happen.as_deref(),
                false,
            )?,
            resolution_request: self.confirm_or_ask(
                "What would you like us to do to resolve the issue",
                current.resolution_request.as_deref(),
                true,
            )?,
        };
        answers.set_issue(&issue);
        Ok(Some(issue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).expect("utf8")
    }

    #[test]
    fn yes_no_reprompts_invalid() {
        let mut p = prompter("maybe\ny\n");
        assert!(p.yes_no("Continue?", false).expect("answer"));
        let out = transcript(p);
        assert!(out.contains("Continue? (y/N) "));
        assert!(out.contains(YES_NO_RETRY));
    }

    #[test]
    fn yes_no_blank_uses_default() {
        let mut p = prompter("\n");
        assert!(p.yes_no("Continue?", true).expect("answer"));
        assert!(transcript(p).contains("(Y/n)"));
    }

    #[test]
    fn ask_without_value_does_not_confirm() {
        let mut p = prompter("Alice\n");
        let name = p.confirm_or_ask("Name", None, false).expect("answer");
        assert_eq!(name.as_deref(), Some("Alice"));
        let out = transcript(p);
        assert!(out.contains("Please enter your Name"));
        assert!(!out.contains("Is this correct"));
    }

    #[test]
    fn rejected_value_is_asked_again() {
        let mut p = prompter("n\nBob\n");
        let name = p.confirm_or_ask("Name", Some("Alice"), false).expect("answer");
        assert_eq!(name.as_deref(), Some("Bob"));
        let out = transcript(p);
        assert!(out.contains("Your Name is Alice. Is this correct? (Y/n) "));
        assert!(out.contains("What is your Name: "));
    }

    #[test]
    fn skippable_text_marks_optional() {
        let mut p = prompter("   \n");
        let email = p.text("Please enter your Email", true).expect("answer");
        assert_eq!(email, None);
        assert!(transcript(p).contains("(optional, press Enter to skip): "));
    }

    #[test]
    fn rating_retries_until_valid() {
        let mut p = prompter("eleven\n11\n7\n");
        assert_eq!(p.rating().expect("rating"), Some(7));
        let out = transcript(p);
        assert!(out.contains(RATING_INTEGER_RETRY));
        assert!(out.contains(RATING_RANGE_RETRY));
    }

    #[test]
    fn rating_zero_means_none() {
        let mut p = prompter("0\n");
        assert_eq!(p.rating().expect("rating"), None);
    }

    #[test]
    fn end_of_input_aborts() {
        let mut p = prompter("");
        let err = p.yes_no("Continue?", true).expect_err("eof");
        assert!(err.downcast_ref::<Aborted>().is_some());
    }

    #[test]
    fn collect_contact_greets_and_stores() {
        let mut answers = Answers::default();
        let mut p = prompter("Sam\n\nsam@example.com\n");
        let contact = p.collect_contact(&mut answers).expect("contact");
        assert_eq!(contact.name.as_deref(), Some("Sam"));
        assert_eq!(answers.phone_number, None);
        assert_eq!(answers.email.as_deref(), Some("sam@example.com"));
        assert!(transcript(p).contains("Hello, Sam!"));
    }

    #[test]
    fn declined_feedback_leaves_answers_untouched() {
        let mut answers = Answers {
            what_happened: Some("old".to_string()),
            ..Answers::default()
        };
        let mut p = prompter("\n");
        assert_eq!(p.collect_issue(&mut answers).expect("issue"), None);
        assert_eq!(answers.what_happened.as_deref(), Some("old"));
    }

    #[test]
    fn accepted_feedback_collects_all_fields() {
        let mut answers = Answers::default();
        let mut p = prompter("y\nBroken lamp\nMonday\nKitchen\nLight\n\n");
        let issue = p
            .collect_issue(&mut answers)
            .expect("issue")
            .expect("accepted");
        assert_eq!(issue.what_happened.as_deref(), Some("Broken lamp"));
        assert_eq!(issue.when_happened.as_deref(), Some("Monday"));
        assert_eq!(issue.where_happened.as_deref(), Some("Kitchen"));
        assert_eq!(issue.expecting_to_happen.as_deref(), Some("Light"));
        assert_eq!(issue.resolution_request, None);
        assert_eq!(answers.issue(), issue);
    }
}
