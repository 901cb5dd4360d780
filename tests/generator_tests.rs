//! Documentation generator tests
//!
//! End-to-end generation over parsed Java sources plus the comment model
//! properties the generator relies on.

use std::path::Path;
use std::sync::Arc;

use autodoc::conventions::{CaseMode, NameScope, PhraseConverter, PhraseOptions};
use autodoc::element::{ElementProvider, Member};
use autodoc::generator::{apply_edits, plan_edits, Generator, NoTemplates};
use autodoc::javadoc::{self, JavadocComment, RenderOptions};
use autodoc::replacements::ReplacementRegistry;
use autodoc::{CommentMode, ConfigSnapshot, JavaSourceParser};

const QUIZ: &str = r#"package com.acme;

public class Quiz {
    /** The number of questions. */
    private int numberOfQuestions;

    public Quiz(int numberOfQuestions) {
        this.numberOfQuestions = numberOfQuestions;
    }

    public int getNumberOfQuestions() {
        return numberOfQuestions;
    }

    public void setNumberOfQuestions(int numberOfQuestions) {
        this.numberOfQuestions = numberOfQuestions;
    }

    public <T> T pick(java.util.List<T> items, int index) throws IllegalArgumentException {
        return items.get(index);
    }
}
"#;

fn generator_with(config: ConfigSnapshot) -> Generator {
    Generator::new(Arc::new(config), Arc::new(NoTemplates))
}

fn generator() -> Generator {
    generator_with(ConfigSnapshot::default())
}

fn parse(source: &str) -> autodoc::CompilationUnit {
    JavaSourceParser::new()
        .parse_unit(Path::new("Quiz.java"), source)
        .unwrap()
}

/// Run one generation pass over a source text
fn generate_source(source: &str, generator: &Generator) -> String {
    let unit = parse(source);
    let plan = plan_edits(&unit, generator);
    assert!(plan.failures.is_empty(), "unexpected failures: {:?}", plan.failures);
    apply_edits(source, &plan.edits).unwrap()
}

fn method<'a>(unit: &'a autodoc::CompilationUnit, name: &str) -> &'a Member {
    unit.members
        .iter()
        .find(|m| matches!(m, Member::Method(_)) && m.name() == name)
        .unwrap()
}

// =============================================================================
// Name-to-phrase scenarios
// =============================================================================

mod phrase_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_identifier_to_phrase() {
        let registry = ReplacementRegistry::new(vec![]);
        let phrase = PhraseConverter::new(&registry).to_phrase(
            "numberOfQuestions",
            NameScope::Field,
            PhraseOptions::default(),
        );
        assert_eq!(phrase, "number of questions");
    }

    #[test]
    fn test_getter_return_phrase() {
        let registry = ReplacementRegistry::new(vec![]);
        let phrase = PhraseConverter::new(&registry).to_phrase(
            "NumberOfQuestions",
            NameScope::Return,
            PhraseOptions::default().with_case(CaseMode::FirstLower),
        );
        assert_eq!(phrase, "number of questions");

        let unit = parse(QUIZ);
        let fields = unit.fields();
        // Without a field doc the getter falls back to the name heuristic
        let getter = match method(&unit, "getNumberOfQuestions") {
            Member::Method(m) => Member::Method(m.clone()),
            _ => unreachable!(),
        };
        let undocumented: Vec<_> = fields
            .into_iter()
            .map(|mut f| {
                f.doc = None;
                f
            })
            .collect();
        let comment = generator()
            .generate(&getter, &JavadocComment::new(), &undocumented)
            .unwrap();
        assert_eq!(comment.return_tag, Some(vec!["the number of questions".to_string()]));
    }
}

// =============================================================================
// Full generation over a parsed unit
// =============================================================================

mod pipeline_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accessors_from_field_doc() {
        let output = generate_source(QUIZ, &generator());

        assert!(output.contains(
            "    /**\n     * Gets the number of questions.\n     *\n     * @return the number of questions\n     */\n    public int getNumberOfQuestions()"
        ));
        assert!(output.contains(
            "    /**\n     * Sets the number of questions.\n     *\n     * @param numberOfQuestions the new number of questions\n     */\n    public void setNumberOfQuestions("
        ));
        // Period is not duplicated
        assert!(!output.contains(".."));
    }

    #[test]
    fn test_constructor_parameter_copies_field_sentence() {
        let output = generate_source(QUIZ, &generator());
        assert!(output.contains(
            "     * Instantiates a new quiz.\n     *\n     * @param numberOfQuestions the number of questions\n"
        ));
    }

    #[test]
    fn test_type_comment_inserted_above_declaration() {
        let output = generate_source(QUIZ, &generator());
        assert!(output.contains("package com.acme;\n\n/**\n * The Class Quiz.\n */\npublic class Quiz {"));
        // The documented field keeps its author layout
        assert!(output.contains("    /** The number of questions. */\n    private int numberOfQuestions;"));
    }

    #[test]
    fn test_generic_method_tags() {
        let output = generate_source(QUIZ, &generator());
        let unit = parse(&output);
        let Member::Method(pick) = method(&unit, "pick") else {
            unreachable!()
        };
        let doc = javadoc::parse(&pick.doc.as_ref().unwrap().text);
        let names: Vec<&str> = doc.params.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["items", "index", "<T>"]);
        assert_eq!(doc.params["<T>"].comments, vec!["the generic type"]);
        assert!(doc.throws.contains_key("IllegalArgumentException"));
        assert!(doc.has_return_text());
    }

    #[test]
    fn test_keep_mode_leaves_documented_members() {
        let source = "class A {\n    /** Hand written */\n    int size() { return 0; }\n}\n";
        let config = ConfigSnapshot::builder().mode(CommentMode::Keep).build().unwrap();
        let output = generate_source(source, &generator_with(config));
        assert!(output.contains("    /** Hand written */\n    int size()"));
    }

    #[test]
    fn test_replace_mode_keeps_other_tags() {
        let source = "class A {\n    /**\n     * Old text\n     * @since 1.2\n     */\n    void run() {}\n}\n";
        let config = ConfigSnapshot::builder().mode(CommentMode::Replace).build().unwrap();
        let output = generate_source(source, &generator_with(config));
        assert!(output.contains("     * Run.\n"), "{}", output);
        assert!(!output.contains("Old text"));
        assert!(output.contains("@since 1.2"));
    }

    #[test]
    fn test_multi_declarator_field_gets_one_comment() {
        let source = "class A {\n    int width, height;\n}\n";
        let output = generate_source(source, &generator());
        assert_eq!(output.matches("/**").count(), 2);
        assert!(output.contains("    /** The width. */\n    int width, height;"));
    }

    #[test]
    fn test_shared_field_comment_edited_once() {
        let source = "class A {\n    /** the size */\n    private int size, capacity;\n}\n";
        let unit = parse(source);
        let plan = plan_edits(&unit, &generator());
        assert_eq!(plan.edits.len(), 2, "{:?}", plan.edits);

        let output = apply_edits(source, &plan.edits).unwrap();
        assert!(output.contains("    /** the size. */\n    private int size, capacity;"), "{}", output);

        let config = ConfigSnapshot::builder().mode(CommentMode::Replace).build().unwrap();
        let output = generate_source(source, &generator_with(config));
        assert_eq!(output.matches("/**").count(), 2);
        assert!(output.contains("    /** The size. */\n    private int size, capacity;"), "{}", output);
    }
}

// =============================================================================
// Idempotence and round trip
// =============================================================================

mod idempotence_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_second_pass_is_a_no_op() {
        let generator = generator();
        let once = generate_source(QUIZ, &generator);
        let unit = parse(&once);
        let plan = plan_edits(&unit, &generator);
        assert!(plan.is_empty(), "second pass produced {:?}", plan.edits);
    }

    #[test]
    fn test_generate_of_generated_is_stable() {
        let unit = parse(QUIZ);
        let fields = unit.fields();
        let generator = generator();
        for member in &unit.members {
            let first = generator.generate(member, &JavadocComment::new(), &fields).unwrap();
            let second = generator.generate(member, &first, &fields).unwrap();
            assert_eq!(first, second, "member {}", member.qualified_name());
        }
    }

    #[test]
    fn test_render_parse_round_trip() {
        let raw = "/**\n * Adds the entry.\n *\n * @param entry the entry\n * @return true, if added\n * @throws IOException the IO exception\n * @since 1.0\n */";
        let comment = javadoc::parse(raw);
        assert_eq!(javadoc::render(&comment, &RenderOptions::default()), raw);
        assert_eq!(javadoc::parse(&javadoc::render(&comment, &RenderOptions::default())), comment);
    }

    #[test]
    fn test_markdown_round_trip() {
        let raw = "/// Gets the size.\n///\n/// @return the size";
        let comment = javadoc::parse(raw);
        assert!(comment.is_markdown);
        let options = RenderOptions {
            markdown: true,
            ..Default::default()
        };
        assert_eq!(javadoc::render(&comment, &options), raw);
    }
}

// =============================================================================
// Tag set and ordering
// =============================================================================

mod tag_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_param_tags_match_formal_parameters() {
        let source = "class A {\n    /**\n     * Moves.\n     * @param gone removed parameter\n     * @param x the x\n     */\n    void move(int x, int y) {}\n}\n";
        let unit = parse(source);
        let member = method(&unit, "move");
        let existing = javadoc::parse(&member.doc().unwrap().text);
        let comment = generator().generate(member, &existing, &unit.fields()).unwrap();

        let names: Vec<&str> = comment.params.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(comment.params["x"].comments, vec!["the x"]);
    }

    #[test]
    fn test_rendered_tag_order() {
        let mut comment = JavadocComment::new();
        comment.free_text = vec!["Text.".to_string()];
        comment.add_other("since", vec!["2.0".to_string()]);
        comment.add_other("author", vec!["me".to_string()]);
        comment.add_throws("IOException", vec!["on failure".to_string()]);
        comment.add_return(vec!["the value".to_string()]);
        comment.add_param("a", vec!["the a".to_string()]);

        let order = ConfigSnapshot::default().tag_order().to_vec();
        let rendered = javadoc::render(
            &comment,
            &RenderOptions {
                tag_order: &order,
                ..Default::default()
            },
        );
        let tags: Vec<&str> = rendered
            .lines()
            .filter_map(|l| l.trim_start_matches(" * ").strip_prefix('@'))
            .map(|l| l.split_whitespace().next().unwrap_or(""))
            .collect();
        assert_eq!(tags, vec!["param", "return", "throws", "author", "since"]);
    }

    #[test]
    fn test_undeclared_throws_kept_after_declared() {
        let source = "class A {\n    /**\n     * Loads.\n     * @throws IllegalStateException when closed\n     */\n    void load() throws java.io.IOException {}\n}\n";
        let unit = parse(source);
        let member = method(&unit, "load");
        let existing = javadoc::parse(&member.doc().unwrap().text);
        let comment = generator().generate(member, &existing, &[]).unwrap();
        let names: Vec<&str> = comment.throws.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["IOException", "IllegalStateException"]);
    }
}

// =============================================================================
// Punctuation
// =============================================================================

mod punctuation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_existing_period_anywhere_is_enough() {
        let mut comment = JavadocComment::new();
        comment.free_text = vec!["Do something.".to_string(), "More text".to_string()];
        assert!(comment.contains_period());
        assert!(!comment.ensure_terminal_period());
        assert_eq!(comment.free_text, vec!["Do something.", "More text"]);
    }

    #[test]
    fn test_missing_period_added_during_generation() {
        let source = "class A {\n    /** Computes the total */\n    int total() { return 0; }\n}\n";
        let output = generate_source(source, &generator());
        assert!(output.contains("Computes the total."));
    }

    #[test]
    fn test_period_not_added_when_disabled() {
        let source = "class A {\n    /** Computes the total */\n    void total() {}\n}\n";
        let config = ConfigSnapshot::builder().add_missing_period(false).build().unwrap();
        let output = generate_source(source, &generator_with(config));
        assert!(!output.contains("total."));
    }
}
