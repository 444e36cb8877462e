use serde_json::{Value, json};

use crate::generator::GenerationRequest;

/// Instruction text sent alongside any attached document.
pub(crate) fn build_prompt(request: &GenerationRequest) -> String {
    let letters: Vec<String> = request.keyword.chars().iter().map(char::to_string).collect();
    let mut prompt = format!(
        "Create {count} multiple-choice Informatics questions for grade {grade} students, \
         written in Vietnamese and aligned with the national high-school curriculum.\n",
        count = letters.len(),
        grade = request.grade.level(),
    );

    if request.forwardable_document().is_some() {
        prompt.push_str("Base the questions on the attached document.\n");
    }
    if let Some(context) = request.context() {
        prompt.push_str("Base the questions on the following text:\n\n");
        prompt.push_str(context);
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "Each question's answer must be a concept related to one letter of the keyword \"{keyword}\".\n\
         The letters, in question order, are: {letters}.\n\
         Return a JSON array of question objects, one per letter, in that order.",
        keyword = request.keyword,
        letters = letters.join(", "),
    ));
    prompt
}

/// JSON schema constraining the model output to an array of question records.
pub(crate) fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": { "type": "STRING", "description": "Question prompt" },
                "options": {
                    "type": "OBJECT",
                    "properties": {
                        "A": { "type": "STRING" },
                        "B": { "type": "STRING" },
                        "C": { "type": "STRING" },
                        "D": { "type": "STRING" }
                    },
                    "required": ["A", "B", "C", "D"]
                },
                "correctAnswer": {
                    "type": "STRING",
                    "enum": ["A", "B", "C", "D"],
                    "description": "Correct option"
                }
            },
            "required": ["text", "options", "correctAnswer"]
        }
    })
}
