//! LLM prompt engineering for reference extraction

use crate::index::LocalIndex;

/// Builds prompts asking the LLM for the references inside a document
pub struct PromptBuilder {
    text: String,
    source_filename: String,
    local_listing: Vec<String>,
    max_chars: Option<usize>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: String, source_filename: String) -> Self {
        Self {
            text,
            source_filename,
            local_listing: Vec::new(),
            max_chars: None,
        }
    }

    /// List the local collection as match targets, at most `limit` entries
    pub fn with_local_index(mut self, index: &LocalIndex, limit: usize) -> Self {
        self.local_listing = index
            .iter()
            .take(limit)
            .map(|meta| {
                let mut line = format!("- {}", meta.filename);
                if let Some(number) = &meta.circular_number {
                    line.push_str(&format!(" | number: {}", number));
                }
                if let Some(subject) = &meta.subject {
                    line.push_str(&format!(" | subject: {}", subject));
                }
                if let Some(date) = &meta.date {
                    line.push_str(&format!(" | date: {}", date));
                }
                if !meta.key_terms.is_empty() {
                    line.push_str(&format!(" | terms: {}", meta.key_terms.join(", ")));
                }
                line
            })
            .collect();
        self
    }

    /// Truncate the document text to `max_chars` characters
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Instruction
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Document under analysis
        prompt.push_str(&format!("Document under analysis: {}\n\n", self.source_filename));

        // 3. Local collection
        if self.local_listing.is_empty() {
            prompt.push_str("Local collection: (empty) - use \"EXTERNAL\" for every reference.\n\n");
        } else {
            prompt.push_str("Local collection (match against these filenames):\n");
            for line in &self.local_listing {
                prompt.push_str(line);
                prompt.push('\n');
            }
            prompt.push('\n');
        }

        // 4. The text to analyze
        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.document_text());
        prompt.push_str("\n---\n\n");

        // 5. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }

    fn document_text(&self) -> String {
        match self.max_chars {
            Some(max) if self.text.chars().count() > max => {
                let mut truncated: String = self.text.chars().take(max).collect();
                truncated.push_str("\n[... document truncated ...]");
                truncated
            }
            _ => self.text.clone(),
        }
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are reviewing a regulatory circular issued by a securities regulator.
Find every reference it makes to another regulatory document: circulars,
master circulars, regulations, acts, notifications, guidelines and
press releases.

For each reference report:
- text: the exact words used in the document
- type: circular, master_circular, regulation, act, notification, guideline or other
- circular_number: the document number, if one is given
- title: the title or subject of the referenced document, if given
- page: the page number, taken from the "--- Page N ---" markers
- context: the sentence containing the reference
- confidence: high, medium or low
- reasoning: one sentence on why this is a reference
- matched_local_file: the exact filename from the local collection that is
  the referenced document, or "EXTERNAL" if none of them is

Rules:
- Match on circular number first, then on subject and date
- Only use filenames that appear in the local collection listing
- Report each distinct reference once
- Do not invent references that are not in the text"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {
    "text": "exact reference text",
    "type": "circular",
    "circular_number": "SEBI/HO/...",
    "title": "title or subject",
    "page": 1,
    "context": "surrounding sentence",
    "confidence": "high",
    "reasoning": "why this is a reference",
    "matched_local_file": "filename.pdf or EXTERNAL"
  }
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations.
Return [] if the document references nothing."#;
