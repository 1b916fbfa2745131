//! Built-in catalog and starter questions, so the app is useful without a model.

use crate::domain::Difficulty;

/// Topic catalog as (name, category), in lookup order.
pub fn seed_catalog() -> Vec<(&'static str, &'static str)> {
  vec![
    ("Java", "backend"),
    ("Python", "backend"),
    ("Node.js", "backend"),
    ("C#", "backend"),
    ("Go", "backend"),
    ("Rust", "backend"),
    ("PHP", "backend"),
    ("JavaScript", "frontend"),
    ("TypeScript", "frontend"),
    ("React", "frontend"),
    ("Vue", "frontend"),
    ("Angular", "frontend"),
    ("HTML", "frontend"),
    ("CSS", "frontend"),
    ("Svelte", "frontend"),
    ("Swift", "mobile"),
    ("Kotlin", "mobile"),
    ("React Native", "mobile"),
    ("Flutter", "mobile"),
  ]
}

pub struct SeedQuestion {
  pub topic: &'static str,
  pub subtopic: &'static str,
  pub text: &'static str,
  pub difficulty: Difficulty,
  pub explanation: Option<&'static str>,
  pub options: &'static [(&'static str, bool)],
}

pub fn seed_questions() -> Vec<SeedQuestion> {
  vec![
    SeedQuestion {
      topic: "Java",
      subtopic: "records",
      text: "What keyword is used to define a record in Java?",
      difficulty: Difficulty::Easy,
      explanation: Some("Java records use the 'record' keyword introduced in Java 14 as a preview feature and made permanent in Java 16."),
      options: &[("record", true), ("class", false), ("struct", false), ("data", false), ("entity", false)],
    },
    SeedQuestion {
      topic: "Java",
      subtopic: "records",
      text: "Are Java records mutable or immutable?",
      difficulty: Difficulty::Medium,
      explanation: None,
      options: &[("Immutable", true), ("Mutable", false), ("Depends on configuration", false), ("Both mutable and immutable", false)],
    },
    SeedQuestion {
      topic: "Java",
      subtopic: "records",
      text: "Can a Java record implement interfaces?",
      difficulty: Difficulty::Hard,
      explanation: Some("Records can implement interfaces but cannot extend other classes since they implicitly extend java.lang.Record."),
      options: &[
        ("Yes, records can implement interfaces", true),
        ("No, records cannot implement anything", false),
        ("Only marker interfaces", false),
        ("Yes, but only functional interfaces", false),
        ("Records can only extend classes", false),
        ("Records support multiple inheritance", false),
      ],
    },
    SeedQuestion {
      topic: "React",
      subtopic: "hooks",
      text: "What is the purpose of the useState hook in React?",
      difficulty: Difficulty::Easy,
      explanation: Some("useState is a React Hook that lets you add state to functional components."),
      options: &[
        ("To manage state in functional components", true),
        ("To handle side effects", false),
        ("To fetch data from APIs", false),
        ("To create context", false),
      ],
    },
    SeedQuestion {
      topic: "React",
      subtopic: "lifecycle",
      text: "Which method is called after a component is rendered for the first time?",
      difficulty: Difficulty::Medium,
      explanation: None,
      options: &[
        ("componentDidMount (class) or useEffect with empty deps (hooks)", true),
        ("componentWillMount", false),
        ("render", false),
        ("constructor", false),
        ("componentDidUpdate", false),
      ],
    },
    SeedQuestion {
      topic: "React",
      subtopic: "fundamentals",
      text: "What is the virtual DOM in React?",
      difficulty: Difficulty::Hard,
      explanation: Some("The virtual DOM is a lightweight copy of the actual DOM. React uses it to optimize updates by comparing changes and only updating what's necessary."),
      options: &[
        ("A lightweight representation of the real DOM", true),
        ("A database for storing component state", false),
        ("A browser API for DOM manipulation", false),
        ("A CSS framework", false),
        ("A server-side rendering technique", false),
        ("A testing library", false),
      ],
    },
  ]
}
