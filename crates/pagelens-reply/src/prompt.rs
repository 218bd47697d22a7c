//! Fixed system instruction for the one-shot page analysis call.

/// Separator between the instruction block and the appended page text.
pub const WEBPAGE_SEPARATOR: &str = "#### WEBPAGE ####";

const INSTRUCTION: &str = r#"This is not a chat. This conversation will end after you reply, make sure you follow instructions and respect the output format specified in the examples.
Below is text that captures a web page being browsed by the user.
Accomplish the following tasks:
1 - Generate a short summary of the contents and bullet points of the most interesting bits that the user should pay attention to.
2 - Using the user's provided memories, determine if the webpage contains content that aligns with the user's memories.
    Only list the facts as available in the memories and the portion of the web page that has a connection to it.
    Some memories might not match, in that case ignore them and do not list them. Only list related memories, if there are any.
    If no memories are related at all, you must return only the exact string: "NO_INTERESTS_FOUND". DO NOT CHANGE THE STRING, ALL IN UPPER CASE.
    Do not explain, summarize, or provide any alternative text if no connection exists. If no memories were provided, also answer with "NO_INTERESTS_FOUND".

Each task must start with a tag [task1] or [task2], as shown in the following examples:
Example 1:

[task1]
## Summary
This webpage ...

## Interesting bits
...

[task2]
- You are interested in chess, one of the recommended articles in the webpage is about chess...

Example 2:
[task1]
Response to task 1

[task2]
NO_INTERESTS_FOUND


Remember that it's either "NO_INTERESTS_FOUND" or memories. Only list relevant memories if there are any.
Below is the content of the web page:
"#;

/// Build the full inference prompt: fixed instruction plus the page text.
pub fn build_prompt(page_content: &str) -> String {
    format!("{INSTRUCTION}{WEBPAGE_SEPARATOR}\n{page_content}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_appends_page_content() {
        let prompt = build_prompt("the page body");
        assert!(prompt.ends_with("the page body"));
        assert!(prompt.contains(WEBPAGE_SEPARATOR));
    }

    #[test]
    fn test_prompt_names_both_tags_and_sentinel() {
        let prompt = build_prompt("");
        assert!(prompt.contains("[task1]"));
        assert!(prompt.contains("[task2]"));
        assert!(prompt.contains("NO_INTERESTS_FOUND"));
    }
}
