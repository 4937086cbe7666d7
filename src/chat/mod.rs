//! Rule-based FAQ chat. Ordered keyword matching over the lowercased
//! message, canned HTML replies, and a scripted three-stage easter egg whose
//! progress persists per session. Not a dialogue engine.

pub mod responses;

use rand::seq::SliceRandom;

/// Easter-egg progress older than this reads as inactive.
pub const EGG_STALE_AFTER_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct ChatUser {
    pub name: String,
    pub is_student: bool,
}

impl ChatUser {
    pub fn guest() -> Self {
        Self {
            name: "there".to_string(),
            is_student: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub reply: String,
    pub close_chat: bool,
    /// New easter-egg stage to persist, when the message advanced it.
    pub egg_stage: Option<i64>,
}

impl ChatReply {
    fn canned(reply: String) -> Self {
        Self {
            reply,
            close_chat: false,
            egg_stage: None,
        }
    }
}

/// Produce the reply for one message. `egg_stage` is the stored easter-egg
/// stage for this session (0 when inactive or stale).
pub fn respond(message: &str, user: &ChatUser, egg_stage: i64) -> ChatReply {
    let text = message.trim().to_lowercase();

    if text.is_empty() {
        return ChatReply::canned(responses::EMPTY_PROMPT.to_string());
    }

    // The easter egg outranks everything, including its own activation
    // phrase on a later message.
    if ["i am gudia", "i'm gudia", "iam gudia"]
        .iter()
        .any(|phrase| text.contains(phrase))
    {
        return ChatReply {
            reply: responses::EGG_ACTIVATED.to_string(),
            close_chat: false,
            egg_stage: Some(1),
        };
    }
    match egg_stage {
        1 => {
            return ChatReply {
                reply: responses::EGG_WARNING.to_string(),
                close_chat: false,
                egg_stage: Some(2),
            }
        }
        2 => {
            return ChatReply {
                reply: responses::EGG_BOOM.to_string(),
                close_chat: true,
                egg_stage: Some(0),
            }
        }
        _ => {}
    }

    if has_word(
        &text,
        &["hi", "hello", "hey", "hii", "hola", "yo", "sup", "greetings", "namaste", "namaskar", "howdy", "wassup"],
    ) || has_phrase(&text, &["good morning", "good afternoon", "good evening", "what's up", "whats up"])
    {
        let pool = if user.is_student {
            responses::STUDENT_GREETINGS
        } else {
            responses::GREETINGS
        };
        return ChatReply::canned(personalize(pick(pool), &user.name));
    }

    if has_word(&text, &["bye", "goodbye", "later", "cya", "thanks", "thanku", "thx"])
        || has_phrase(&text, &["see ya", "see you", "take care", "thank you", "gotta go", "have to go"])
    {
        let mut reply = personalize(pick(responses::FAREWELLS), &user.name);
        if user.is_student {
            reply = format!("Keep practicing, {}! 💪 {}", user.name, reply);
        }
        return ChatReply::canned(reply);
    }

    if has_phrase(&text, &["how are you", "how r u", "are you ok", "are you okay", "are you fine", "are you good"]) {
        return ChatReply::canned(personalize(pick(responses::SMALL_TALK), &user.name));
    }

    if has_phrase(
        &text,
        &["who are you", "what are you", "your name", "about you", "tell me about yourself", "who created you"],
    ) {
        return ChatReply::canned(personalize(pick(responses::IDENTITY), &user.name));
    }

    let about_hits = keyword_hits(&text, &["about", "who is", "tell me", "information", "details"]);
    if about_hits >= 1 && has_phrase(&text, &["class", "coaching", "center", "academy", "institute"]) {
        return ChatReply::canned(responses::ABOUT.to_string());
    }

    if has_phrase(&text, &["teacher", "instructor", "coach", "mentor", "trainer", "who teaches"]) {
        return ChatReply::canned(responses::INSTRUCTOR.to_string());
    }

    if keyword_hits(
        &text,
        &["batch", "timing", "class", "schedule", "when", "availability", "session", "hours", "days"],
    ) >= 1
    {
        let body = if user.is_student {
            personalize(responses::BATCHES_STUDENT, &user.name)
        } else {
            responses::BATCHES_GUEST.to_string()
        };
        return ChatReply::canned(format!("{}<br><br>{}", pick(responses::THINKING_PHRASES), body));
    }

    if keyword_hits(
        &text,
        &["fee", "fees", "price", "cost", "charge", "payment", "how much", "amount", "money", "pay", "expensive", "afford"],
    ) >= 1
    {
        return ChatReply::canned(responses::FEES.to_string());
    }

    if keyword_hits(
        &text,
        &["tournament", "competition", "contest", "match", "championship", "sunday"],
    ) >= 1
    {
        return ChatReply::canned(responses::TOURNAMENTS.to_string());
    }

    if keyword_hits(
        &text,
        &["enroll", "join", "admission", "register", "sign up", "how to join", "registration", "apply"],
    ) >= 1
    {
        return ChatReply::canned(format!(
            "{}<br><br>{}",
            pick(responses::ENCOURAGEMENTS),
            responses::ENROLLMENT
        ));
    }

    if keyword_hits(
        &text,
        &["age", "old", "child", "kid", "adult", "eligibility", "who can join", "age limit"],
    ) >= 1
    {
        return ChatReply::canned(responses::AGE.to_string());
    }

    if user.is_student
        && has_phrase(
            &text,
            &["my ", "progress", "attendance", "homework", "assignment", "report", "performance", "dashboard"],
        )
    {
        return ChatReply::canned(personalize(responses::DASHBOARD, &user.name));
    }

    if has_phrase(&text, &["discount", "offer", "concession", "coupon", "promo", "cheaper"]) {
        return ChatReply::canned(responses::DISCOUNTS.to_string());
    }

    if has_phrase(&text, &["location", "address", "where are you", "city", "nagpur", "directions"]) {
        return ChatReply::canned(responses::LOCATION.to_string());
    }

    if has_phrase(&text, &["joke", "funny", "laugh", "humor"]) {
        return ChatReply::canned(pick(responses::JOKES).to_string());
    }

    if has_phrase(
        &text,
        &["good bot", "helpful", "great", "awesome", "nice", "smart", "amazing"],
    ) {
        return ChatReply::canned(personalize(pick(responses::COMPLIMENTS), &user.name));
    }

    if has_phrase(
        &text,
        &["what can you do", "help me", "what do you know", "capabilities", "features", "options"],
    ) {
        return ChatReply::canned(responses::CAPABILITIES.to_string());
    }

    ChatReply::canned(format!(
        "🤔 I'm not quite sure what you're asking. ❓<br><br>\
         I help with <strong>Rookery Chess Academy</strong> information! ♟️<br><br>\
         <strong>Some things you can ask:</strong><br>\
         • {}<br>\
         • <strong>How do I sign up?</strong> 📝<br>\
         • <strong>Do you have Sunday tournaments?</strong> 🏆<br><br>\
         Or type what you want to know — I'll do my best to understand! 😊",
        pick(responses::FALLBACK_SUGGESTIONS)
    ))
}

fn pick(pool: &[&'static str]) -> &'static str {
    // Pools are non-empty constants.
    pool.choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(pool[0])
}

fn personalize(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}

fn has_word(text: &str, words: &[&str]) -> bool {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .any(|token| words.contains(&token))
}

fn has_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}
