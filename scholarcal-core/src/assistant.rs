//! Canned-response assistant.
//!
//! The site's help widget offers a fixed menu; each choice maps to a fixed
//! answer. The conversation is an explicit value owned by the caller.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistantOption {
    Welcome,
    LearnWebsite,
    FindScholarships,
    UnderstandDeadlines,
    EssayTips,
    Faq,
}

impl AssistantOption {
    /// Options shown as buttons, in display order.
    pub const GUIDED: [AssistantOption; 5] = [
        AssistantOption::LearnWebsite,
        AssistantOption::FindScholarships,
        AssistantOption::UnderstandDeadlines,
        AssistantOption::EssayTips,
        AssistantOption::Faq,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            AssistantOption::Welcome => "welcome",
            AssistantOption::LearnWebsite => "learn-website",
            AssistantOption::FindScholarships => "find-scholarships",
            AssistantOption::UnderstandDeadlines => "understand-deadlines",
            AssistantOption::EssayTips => "essay-tips",
            AssistantOption::Faq => "faq",
        }
    }

    /// Button label, also echoed as the user's message.
    pub fn label(&self) -> &'static str {
        match self {
            AssistantOption::Welcome => "Hello",
            AssistantOption::LearnWebsite => "Learn about this website",
            AssistantOption::FindScholarships => "Find scholarships",
            AssistantOption::UnderstandDeadlines => "Understand deadlines",
            AssistantOption::EssayTips => "Essay tips",
            AssistantOption::Faq => "FAQ",
        }
    }

    pub fn response(&self) -> &'static str {
        match self {
            AssistantOption::Welcome => {
                "Hi, I'm Omnia! I can explain how the site works, help you find \
                 scholarships, and keep track of deadlines. Pick a topic below."
            }
            AssistantOption::LearnWebsite => {
                "Opportune AI matches students with open scholarships. Share your \
                 profile once and we show you awards that fit, with their amounts, \
                 deadlines, and links to apply."
            }
            AssistantOption::FindScholarships => {
                "Fill out your profile on the 'Get Started' page with your major, GPA, \
                 interests, and background. Our AI will then match you with relevant \
                 scholarships."
            }
            AssistantOption::UnderstandDeadlines => {
                "Every result shows its deadline. Use 'Add to calendar' to download an \
                 .ics file or open Google Calendar, and you'll get a reminder the day \
                 before. Aim to submit a few days early."
            }
            AssistantOption::EssayTips => {
                "Answer the prompt directly, tell a specific story only you can tell, \
                 connect it to your goals, stay within the word limit, and proofread \
                 before you submit."
            }
            AssistantOption::Faq => FAQ,
        }
    }
}

const FAQ: &str = "1. What does this site do?
Opportune AI helps you find real scholarships that match your profile. Share some basic info like your major, GPA, interests, and background, and we show scholarships that are currently open and a good fit for you.

2. How do I use it?
Fill out the short form with your student info, click \"Find Scholarships\", and wait a few seconds. You'll see a list of scholarships with their deadlines, amounts, and links to apply.

3. Is this site free to use?
Yes, completely free. You don't have to pay to search or view scholarships.

4. What kind of scholarships can I find here?
A mix of merit-based, need-based, major-specific, and demographic-based awards.";

impl fmt::Display for AssistantOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AssistantOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        std::iter::once(AssistantOption::Welcome)
            .chain(AssistantOption::GUIDED)
            .find(|option| option.id() == s)
            .ok_or_else(|| {
                let known: Vec<_> = AssistantOption::GUIDED.iter().map(|o| o.id()).collect();
                format!("Unknown option '{}'. Available: {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub content: String,
}

/// Transcript of one assistant session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Conversation::default()
    }

    /// Show the widget; greets only on the first open.
    pub fn open(&mut self) {
        if self.messages.is_empty() {
            self.push(Speaker::Assistant, AssistantOption::Welcome.response());
        }
    }

    /// Record a menu choice and its canned answer.
    pub fn choose(&mut self, option: AssistantOption) -> &'static str {
        self.open();
        self.push(Speaker::User, option.label());
        self.push(Speaker::Assistant, option.response());
        option.response()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, speaker: Speaker, content: &str) {
        self.messages.push(ChatMessage {
            speaker,
            content: content.to_string(),
        });
    }
}
