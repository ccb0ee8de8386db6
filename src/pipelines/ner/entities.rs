//! Turning per-token tags into entity spans.
//!
//! Sub-word pieces are first merged back into words (a word takes the tag of its first
//! piece), then consecutive words are grouped under BIO/BIOES rules. `S-` and `E-` tags
//! close their span.

/// One tokenizer token with its predicted tag. Special tokens are never tagged.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedToken {
    /// Index of the word this token belongs to.
    pub word_id: u32,
    /// Byte offset of the token start in the input.
    pub start: usize,
    /// Byte offset of the token end in the input.
    pub end: usize,
    /// Raw model tag, e.g. `B-PER`, `I-LOC`, `O`.
    pub label: String,
    /// Probability of `label`.
    pub score: f32,
}

/// A contiguous run of words tagged with the same entity group.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Entity group without the BIO prefix, e.g. `PER`.
    pub group: String,
    /// Words of the span, separated by one space where the input has whitespace between
    /// them and joined directly otherwise (`Jean-Luc`, `O'Brien`).
    pub text: String,
    /// Mean word score.
    pub score: f32,
    /// Byte offset of the span start in the input.
    pub start: usize,
    /// Byte offset of the span end in the input.
    pub end: usize,
}

impl Entity {
    /// `PER` (CoNLL) or `PERSON` (OntoNotes).
    pub fn is_person(&self) -> bool {
        matches!(self.group.as_str(), "PER" | "PERSON")
    }
}

#[derive(Debug)]
struct Word<'t> {
    text: &'t str,
    start: usize,
    end: usize,
    label: &'t str,
    score: f32,
}

#[derive(Debug, PartialEq, Eq)]
enum Tag<'l> {
    Outside,
    Begin(&'l str),
    Inside(&'l str),
    End(&'l str),
    Single(&'l str),
}

fn parse_tag(label: &str) -> Tag<'_> {
    if label == "O" || label.is_empty() {
        return Tag::Outside;
    }
    match label.split_once('-') {
        Some(("B", group)) => Tag::Begin(group),
        Some(("I", group)) => Tag::Inside(group),
        Some(("E", group)) => Tag::End(group),
        Some(("S", group)) => Tag::Single(group),
        // Checkpoints without a scheme prefix tag every word with the bare group.
        _ => Tag::Inside(label),
    }
}

fn merge_words<'t>(text: &'t str, tokens: &'t [TaggedToken]) -> Vec<Word<'t>> {
    let mut words: Vec<(u32, Word<'t>)> = Vec::new();

    for token in tokens {
        match words.last_mut() {
            Some((word_id, word)) if *word_id == token.word_id => {
                word.end = token.end;
            }
            _ => words.push((
                token.word_id,
                Word {
                    text: "",
                    start: token.start,
                    end: token.end,
                    label: &token.label,
                    score: token.score,
                },
            )),
        }
    }

    words
        .into_iter()
        .map(|(_, mut word)| {
            word.text = text.get(word.start..word.end).unwrap_or_default();
            word
        })
        .collect()
}

struct SpanBuilder<'t> {
    group: &'t str,
    words: Vec<Word<'t>>,
}

impl<'t> SpanBuilder<'t> {
    fn new(group: &'t str, word: Word<'t>) -> Self {
        Self {
            group,
            words: vec![word],
        }
    }

    fn finish(self, source: &str) -> Entity {
        let mut text = String::new();
        let mut prev_end = None;
        for word in &self.words {
            let spaced = prev_end.is_some_and(|end| {
                source
                    .get(end..word.start)
                    .is_some_and(|gap| gap.chars().any(char::is_whitespace))
            });
            if spaced {
                text.push(' ');
            }
            text.push_str(word.text);
            prev_end = Some(word.end);
        }
        let score = self.words.iter().map(|w| w.score).sum::<f32>() / self.words.len() as f32;

        Entity {
            group: self.group.to_string(),
            text,
            score,
            start: self.words.first().map_or(0, |w| w.start),
            end: self.words.last().map_or(0, |w| w.end),
        }
    }
}

/// Groups tagged tokens of `text` into entity spans, in input order.
pub fn group_entities(text: &str, tokens: &[TaggedToken]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut current: Option<SpanBuilder<'_>> = None;

    for word in merge_words(text, tokens) {
        let open_group = current.as_ref().map(|span| span.group);
        match parse_tag(word.label) {
            Tag::Outside => {
                entities.extend(current.take().map(|span| span.finish(text)));
            }
            Tag::Inside(group) if open_group == Some(group) => {
                if let Some(span) = current.as_mut() {
                    span.words.push(word);
                }
            }
            Tag::End(group) if open_group == Some(group) => {
                if let Some(mut span) = current.take() {
                    span.words.push(word);
                    entities.push(span.finish(text));
                }
            }
            Tag::Begin(group) | Tag::Inside(group) => {
                entities.extend(current.take().map(|span| span.finish(text)));
                current = Some(SpanBuilder::new(group, word));
            }
            Tag::End(group) | Tag::Single(group) => {
                entities.extend(current.take().map(|span| span.finish(text)));
                entities.push(SpanBuilder::new(group, word).finish(text));
            }
        }
    }
    entities.extend(current.map(|span| span.finish(text)));

    entities
}
