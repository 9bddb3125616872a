//! Prompt templates for content generation

/// Prompt builder for document study queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build a grounded question-answering prompt
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Based on the following context from the document, answer the question.

Context:
{context}

Question: {question}

Answer:"#,
            context = context,
            question = question
        )
    }

    /// Question for a document summary
    pub fn summary_question(short: bool) -> String {
        if short {
            "Provide a short (3-4 sentence) summary of this document.".to_string()
        } else {
            "Summarize the content of this document as if it were a fantasy story. \
             Include the main events, characters, or important ideas, \
             but present them in a magical, storytelling style."
                .to_string()
        }
    }

    /// Question for extracting key points
    pub fn keypoints_question(count: usize) -> String {
        format!(
            "Extract the {} most important key points from this document as a numbered list. \
             Return each point as a single line starting with the number.",
            count
        )
    }

    /// Question asking for a quiz in strict JSON format
    pub fn quiz_question(n_questions: usize) -> String {
        format!(
            r#"Based on the document content, create exactly {n} multiple-choice questions.

IMPORTANT: Return ONLY a valid JSON object, no extra text before or after.

Format EXACTLY like this example:
{{
  "quiz": [
    {{
      "q": "What is the main concept discussed in the document?",
      "options": [
        "Machine learning algorithms",
        "Data preprocessing techniques",
        "Neural network architectures",
        "Statistical analysis methods"
      ],
      "answer": 2,
      "explanation": "The document focuses primarily on neural network architectures."
    }}
  ]
}}

Rules:
- Each question must have exactly 4 options
- The 'answer' field is the index (0-3) of the correct option
- Options must be specific content from the document, not generic labels
- Questions should test actual comprehension of the document

Generate {n} questions now in the exact JSON format shown above."#,
            n = n_questions
        )
    }

    /// Question used by the quiz fallback to recover document topics
    pub fn topics_question() -> String {
        "What are the 4 main topics or concepts discussed in this document? \
         List them briefly."
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_prompt_embeds_context_and_question() {
        let prompt = PromptBuilder::build_qa_prompt("What is X?", "X is a thing.");
        assert!(prompt.contains("X is a thing."));
        assert!(prompt.contains("Question: What is X?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn summary_question_varies_by_length() {
        assert!(PromptBuilder::summary_question(true).contains("3-4 sentence"));
        assert!(PromptBuilder::summary_question(false).contains("fantasy"));
    }

    #[test]
    fn quiz_question_names_the_count() {
        let prompt = PromptBuilder::quiz_question(7);
        assert!(prompt.contains("exactly 7 multiple-choice"));
        assert!(prompt.contains("\"quiz\""));
    }
}
