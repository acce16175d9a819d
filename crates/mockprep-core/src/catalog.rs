//! Static reference data: question catalogs, company questions, coding
//! challenges, and industry benchmarks.
//!
//! A [`Catalog`] is built once at startup (from the built-in tables or a TOML
//! override, see [`crate::parser`]) and is read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InterviewError;
use crate::model::{Criterion, Difficulty, Role, Round, ScoreVector};

/// Reference scores for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub scores: ScoreVector,
    pub overall: f64,
}

impl Benchmark {
    pub fn get(&self, criterion: Criterion) -> f64 {
        self.scores.get(criterion)
    }
}

/// All read-only reference data used by the selector and analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    questions: BTreeMap<(Role, Round), Vec<String>>,
    companies: BTreeMap<String, Vec<String>>,
    coding_challenges: BTreeMap<Difficulty, Vec<String>>,
    benchmarks: BTreeMap<Role, Benchmark>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The reference data shipped with mockprep.
    pub fn builtin() -> Self {
        let to_vec = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let questions = BUILTIN_QUESTIONS
            .iter()
            .map(|(role, round, items)| ((*role, *round), to_vec(*items)))
            .collect();
        let companies = BUILTIN_COMPANIES
            .iter()
            .map(|(name, items)| (name.to_string(), to_vec(*items)))
            .collect();
        let coding_challenges = BUILTIN_CODING_CHALLENGES
            .iter()
            .map(|(difficulty, items)| (*difficulty, to_vec(*items)))
            .collect();
        let benchmarks = BUILTIN_BENCHMARKS
            .iter()
            .map(|(role, values, overall)| {
                (
                    *role,
                    Benchmark {
                        scores: ScoreVector::from_values(*values),
                        overall: *overall,
                    },
                )
            })
            .collect();

        Self {
            questions,
            companies,
            coding_challenges,
            benchmarks,
        }
    }

    /// Canned questions for a role/round cell.
    pub fn questions(&self, role: Role, round: Round) -> Result<&[String], InterviewError> {
        self.questions
            .get(&(role, round))
            .filter(|q| !q.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| InterviewError::unknown("role/round", format!("{role}/{round}")))
    }

    /// Company-specific questions. The lookup is case-insensitive.
    pub fn company_questions(&self, company: &str) -> Result<&[String], InterviewError> {
        let key = company.trim().to_lowercase();
        self.companies
            .get(&key)
            .filter(|q| !q.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| InterviewError::unknown("company", key))
    }

    /// Coding challenges for one difficulty tier.
    pub fn coding_challenges(&self, difficulty: Difficulty) -> Result<&[String], InterviewError> {
        self.coding_challenges
            .get(&difficulty)
            .filter(|q| !q.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| InterviewError::unknown("difficulty", difficulty.to_string()))
    }

    /// Known company names, lowercase.
    pub fn companies(&self) -> impl Iterator<Item = &str> {
        self.companies.keys().map(String::as_str)
    }

    /// Industry benchmark for a role. Every role always has one.
    pub fn benchmark(&self, role: Role) -> Benchmark {
        self.benchmarks
            .get(&role)
            .copied()
            .unwrap_or_else(|| builtin_benchmark(role))
    }

    pub(crate) fn set_questions(&mut self, role: Role, round: Round, items: Vec<String>) {
        self.questions.insert((role, round), items);
    }

    pub(crate) fn set_company(&mut self, name: &str, items: Vec<String>) {
        self.companies.insert(name.trim().to_lowercase(), items);
    }

    pub(crate) fn set_coding_challenges(&mut self, difficulty: Difficulty, items: Vec<String>) {
        self.coding_challenges.insert(difficulty, items);
    }

    pub(crate) fn set_benchmark(&mut self, role: Role, benchmark: Benchmark) {
        self.benchmarks.insert(role, benchmark);
    }

    pub(crate) fn question_cells(&self) -> impl Iterator<Item = (&(Role, Round), &Vec<String>)> {
        self.questions.iter()
    }

    pub(crate) fn company_entries(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.companies.iter()
    }

    pub(crate) fn challenge_tiers(&self) -> impl Iterator<Item = (&Difficulty, &Vec<String>)> {
        self.coding_challenges.iter()
    }

    pub(crate) fn benchmark_entries(&self) -> impl Iterator<Item = (&Role, &Benchmark)> {
        self.benchmarks.iter()
    }
}

fn builtin_benchmark(role: Role) -> Benchmark {
    let (_, values, overall) = BUILTIN_BENCHMARKS
        .iter()
        .find(|(r, _, _)| *r == role)
        .copied()
        .unwrap_or(BUILTIN_BENCHMARKS[0]);
    Benchmark {
        scores: ScoreVector::from_values(values),
        overall,
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// Values in canonical criterion order, then the overall reference.
const BUILTIN_BENCHMARKS: [(Role, [f64; 7], f64); 3] = [
    (Role::Sde, [7.5, 7.2, 6.8, 7.0, 7.8, 7.3, 7.1], 7.2),
    (Role::Ml, [8.0, 7.0, 6.9, 6.8, 7.9, 7.5, 7.2], 7.3),
    (Role::Cloud, [7.8, 7.3, 7.0, 7.2, 7.7, 7.4, 7.0], 7.3),
];

const BUILTIN_QUESTIONS: &[(Role, Round, &[&str])] = &[
    (
        Role::Sde,
        Round::Technical,
        &[
            "Design a URL shortener like bit.ly with high availability",
            "Implement rate limiting for an API",
            "Design a chat application system architecture",
            "How would you handle database scaling?",
            "Explain microservices vs monolithic architecture",
        ],
    ),
    (
        Role::Sde,
        Round::Hr,
        &[
            "Why do you want to work in software engineering?",
            "Describe your coding journey and what motivates you",
            "How do you debug complex technical issues?",
            "Tell me about a challenging project you worked on",
            "How do you stay updated with new technologies?",
        ],
    ),
    (
        Role::Sde,
        Round::Managerial,
        &[
            "How would you mentor junior developers?",
            "How do you prioritize features with tight deadlines?",
            "How would you handle technical debt in a project?",
            "Describe your approach to code reviews",
            "How do you handle disagreements in technical decisions?",
        ],
    ),
    (
        Role::Ml,
        Round::Technical,
        &[
            "Design a recommendation system for e-commerce",
            "How do you handle imbalanced datasets?",
            "Explain the bias-variance tradeoff",
            "How would you deploy an ML model at scale?",
            "What's your approach to feature engineering?",
        ],
    ),
    (
        Role::Ml,
        Round::Hr,
        &[
            "Why did you choose machine learning?",
            "How do you explain ML concepts to non-technical people?",
            "How do you stay updated with ML research?",
            "Describe a challenging ML project you worked on",
            "What's your favorite ML algorithm and why?",
        ],
    ),
    (
        Role::Ml,
        Round::Managerial,
        &[
            "How would you lead an ML team?",
            "How do you balance model accuracy vs speed?",
            "How do you manage ML project timelines?",
            "How do you handle model performance degradation?",
            "How do you ensure ML model fairness?",
        ],
    ),
    (
        Role::Cloud,
        Round::Technical,
        &[
            "Design a multi-region cloud architecture",
            "How do you implement auto-scaling?",
            "What are your cloud cost optimization strategies?",
            "Explain containerization vs virtualization",
            "How do you ensure cloud security?",
        ],
    ),
    (
        Role::Cloud,
        Round::Hr,
        &[
            "Why cloud computing over traditional infrastructure?",
            "How do you explain cloud benefits to clients?",
            "How do you handle cloud migration challenges?",
            "Describe your experience with cloud platforms",
            "What cloud certifications do you have?",
        ],
    ),
    (
        Role::Cloud,
        Round::Managerial,
        &[
            "How would you lead a cloud transformation?",
            "How do you balance security vs accessibility?",
            "How do you manage cloud budgets?",
            "How do you handle cloud vendor lock-in?",
            "How do you ensure cloud compliance?",
        ],
    ),
];

const BUILTIN_COMPANIES: &[(&str, &[&str])] = &[
    (
        "google",
        &[
            "How would you handle Google's scale of data processing?",
            "Explain how you'd contribute to Google's mission to organize world's information",
            "How do you approach innovation at Google's pace?",
        ],
    ),
    (
        "amazon",
        &[
            "How would you apply Amazon's leadership principles in your role?",
            "Describe how you'd optimize for customer obsession",
            "How do you handle Amazon's high-performance culture?",
        ],
    ),
    (
        "microsoft",
        &[
            "How would you contribute to Microsoft's cloud-first strategy?",
            "Explain your approach to inclusive design",
            "How do you embody Microsoft's growth mindset?",
        ],
    ),
    (
        "meta",
        &[
            "How would you build for the next billion users?",
            "Explain your approach to connecting people globally",
            "How do you handle Meta's move fast philosophy?",
        ],
    ),
];

const BUILTIN_CODING_CHALLENGES: &[(Difficulty, &[&str])] = &[
    (
        Difficulty::Easy,
        &[
            "Write a function to reverse a string",
            "Find the maximum element in an array",
            "Check if a string is a palindrome",
            "Implement FizzBuzz",
        ],
    ),
    (
        Difficulty::Medium,
        &[
            "Implement a binary search algorithm",
            "Find the longest substring without repeating characters",
            "Merge two sorted linked lists",
            "Validate a binary search tree",
        ],
    ),
    (
        Difficulty::Hard,
        &[
            "Design and implement an LRU cache",
            "Find median of two sorted arrays",
            "Serialize and deserialize a binary tree",
            "Implement a trie data structure",
        ],
    ),
];
