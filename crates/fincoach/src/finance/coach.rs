//! Static coaching content: a tip catalog and pattern-matched answers.

use serde::{Deserialize, Serialize};

use super::profile::ProfileFigures;
use super::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
}

pub const TIPS: [Tip; 7] = [
    Tip {
        id: 1,
        title: "The 50/30/20 Rule",
        description: "Allocate 50% of your income to needs, 30% to wants, and 20% to savings and debt repayment.",
    },
    Tip {
        id: 2,
        title: "Emergency Fund First",
        description: "Before investing heavily, build an emergency fund covering 3-6 months of expenses.",
    },
    Tip {
        id: 3,
        title: "Pay Yourself First",
        description: "Set up automatic transfers to your savings and investment accounts on payday.",
    },
    Tip {
        id: 4,
        title: "The Power of Compound Interest",
        description: "Starting to invest early leads to significant wealth over time due to compounding.",
    },
    Tip {
        id: 5,
        title: "Debt Snowball Method",
        description: "Pay off the smallest debt first, then roll that payment into the next one.",
    },
    Tip {
        id: 6,
        title: "Track Your Spending",
        description: "Regularly review your expenses to make intentional financial decisions.",
    },
    Tip {
        id: 7,
        title: "Automate Your Finances",
        description: "Set up automatic payments for bills, savings, and investments.",
    },
];

pub fn tip_by_id(id: u32) -> Option<Tip> {
    TIPS.iter().find(|tip| tip.id == id).copied()
}

/// Map a random draw onto the catalog.
pub fn tip_for_draw(draw: u32) -> Tip {
    TIPS[draw as usize % TIPS.len()]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub recommendation: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachAnswer {
    pub response: String,
    pub actions: Vec<CoachAction>,
}

const FALLBACK_RESPONSE: &str =
    "Sorry, I couldn't find a personalized answer to that question. Please try rephrasing it.";

/// ₹5L over two years.
const SAVINGS_GOAL_TARGET: f64 = 500_000.0;
const SAVINGS_GOAL_MONTHS: f64 = 24.0;

struct Faq {
    patterns: &'static [&'static str],
    answer: fn(&ProfileFigures) -> CoachAnswer,
}

const FAQS: [Faq; 3] = [
    Faq {
        patterns: &["save", "5l", "5 lakh", "save money", "savings goal"],
        answer: savings_goal_answer,
    },
    Faq {
        patterns: &["emergency", "rainy day"],
        answer: emergency_fund_answer,
    },
    Faq {
        patterns: &["debt", "loan", "emi"],
        answer: debt_payoff_answer,
    },
];

/// First FAQ with a pattern starting a word of the question wins.
pub fn answer_question(question: &str, figures: &ProfileFigures) -> CoachAnswer {
    let question = question.to_lowercase();
    FAQS.iter()
        .find(|faq| {
            faq.patterns
                .iter()
                .any(|pattern| starts_a_word(&question, pattern))
        })
        .map(|faq| (faq.answer)(figures))
        .unwrap_or_else(|| CoachAnswer {
            response: FALLBACK_RESPONSE.to_string(),
            actions: Vec::new(),
        })
}

/// "emi" matches "emis" and "EMI-free" but not "premium" or "remind".
fn starts_a_word(text: &str, pattern: &str) -> bool {
    text.match_indices(pattern).any(|(at, _)| {
        text[..at]
            .chars()
            .next_back()
            .map_or(true, |before| !before.is_alphanumeric())
    })
}

fn rupees(amount: f64) -> String {
    format!("₹{}", round_half_up(amount) as i64)
}

fn savings_goal_answer(figures: &ProfileFigures) -> CoachAnswer {
    let current_savings = figures.monthly_surplus();
    let required = SAVINGS_GOAL_TARGET / SAVINGS_GOAL_MONTHS;
    let gap = (required - current_savings).max(0.0);

    let spending = if gap > 0.0 {
        CoachAction {
            kind: "Spending",
            recommendation: format!("Reduce expenses by {} monthly", rupees(gap)),
            impact: Impact::Medium,
        }
    } else {
        CoachAction {
            kind: "Spending",
            recommendation: "Current savings rate is sufficient to meet this goal".to_string(),
            impact: Impact::Low,
        }
    };

    CoachAnswer {
        response: format!(
            "To save ₹5L in 2 years, you'd need to save approx. {} per month.",
            rupees(required)
        ),
        actions: vec![
            CoachAction {
                kind: "Saving",
                recommendation: format!("Set aside {} monthly", rupees(required)),
                impact: Impact::High,
            },
            spending,
            CoachAction {
                kind: "Investment",
                recommendation: "Consider a recurring deposit or liquid fund for short-term goals"
                    .to_string(),
                impact: Impact::Medium,
            },
        ],
    }
}

fn emergency_fund_answer(figures: &ProfileFigures) -> CoachAnswer {
    let target = figures.essential_expenses() * 6.0;
    let shortfall = (target - figures.emergency_fund).max(0.0);

    let mut actions = Vec::new();
    if shortfall > 0.0 {
        let monthly = shortfall / 12.0;
        actions.push(CoachAction {
            kind: "Saving",
            recommendation: format!(
                "Set aside {} monthly to close the gap within a year",
                rupees(monthly)
            ),
            impact: Impact::High,
        });
    }
    actions.push(CoachAction {
        kind: "Investment",
        recommendation: "Keep the emergency fund in a savings account or liquid fund".to_string(),
        impact: Impact::Medium,
    });

    let response = if shortfall > 0.0 {
        format!(
            "Aim for {} (6 months of essential expenses); you are {} short.",
            rupees(target),
            rupees(shortfall)
        )
    } else {
        format!(
            "Your emergency fund already covers the {} target of 6 months of essential expenses.",
            rupees(target)
        )
    };

    CoachAnswer { response, actions }
}

fn debt_payoff_answer(figures: &ProfileFigures) -> CoachAnswer {
    if figures.total_debt <= 0.0 {
        return CoachAnswer {
            response: "You have no outstanding debt recorded. Keep it that way!".to_string(),
            actions: Vec::new(),
        };
    }

    let months = figures.debt_free_months();
    let response = if months > 0 {
        format!(
            "At your current EMI of {} you will be debt-free in about {} months.",
            rupees(figures.monthly_emi),
            months
        )
    } else {
        format!(
            "You owe {} but have no monthly EMI recorded, so the debt will not shrink.",
            rupees(figures.total_debt)
        )
    };

    let mut actions = vec![CoachAction {
        kind: "Debt",
        recommendation: "Pay down the highest-interest balance first".to_string(),
        impact: Impact::High,
    }];
    let surplus = figures.monthly_surplus() - figures.monthly_emi;
    if surplus > 0.0 {
        actions.push(CoachAction {
            kind: "Spending",
            recommendation: format!(
                "Direct part of your {} monthly surplus to prepayments",
                rupees(surplus)
            ),
            impact: Impact::Medium,
        });
    }

    CoachAnswer { response, actions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tips_resolve_by_id_and_draw() {
        assert_eq!(tip_by_id(2).map(|tip| tip.title), Some("Emergency Fund First"));
        assert_eq!(tip_by_id(99), None);
        assert_eq!(tip_for_draw(0).id, 1);
        assert_eq!(tip_for_draw(7).id, 1);
        assert_eq!(tip_for_draw(u32::MAX).id, TIPS[u32::MAX as usize % 7].id);
    }

    #[test]
    fn savings_goal_reports_required_monthly_amount() {
        let figures = ProfileFigures {
            monthly_salary: 50_000.0,
            rent: 40_000.0,
            ..ProfileFigures::default()
        };
        let answer = answer_question("How can I SAVE 5 lakh?", &figures);
        assert!(answer.response.contains("₹20833"));
        assert_eq!(answer.actions.len(), 3);
        assert_eq!(answer.actions[1].recommendation, "Reduce expenses by ₹10833 monthly");
        assert_eq!(answer.actions[1].impact, Impact::Medium);
    }

    #[test]
    fn savings_goal_recognises_sufficient_surplus() {
        let figures = ProfileFigures {
            monthly_salary: 100_000.0,
            ..ProfileFigures::default()
        };
        let answer = answer_question("savings goal", &figures);
        assert_eq!(answer.actions[1].impact, Impact::Low);
    }

    #[test]
    fn debt_question_reports_payoff_timeline() {
        let figures = ProfileFigures {
            monthly_salary: 60_000.0,
            total_debt: 100_000.0,
            monthly_emi: 15_000.0,
            ..ProfileFigures::default()
        };
        let answer = answer_question("When will my loan be gone?", &figures);
        assert!(answer.response.contains("7 months"));
        assert_eq!(answer.actions.len(), 2);
    }

    #[test]
    fn patterns_only_match_at_word_starts() {
        let figures = ProfileFigures {
            monthly_salary: 60_000.0,
            total_debt: 100_000.0,
            monthly_emi: 15_000.0,
            ..ProfileFigures::default()
        };
        for question in [
            "Is the premium plan worth it?",
            "Should I buy a semi-detached house?",
            "Remind me about my budget",
        ] {
            let answer = answer_question(question, &figures);
            assert_eq!(answer.response, FALLBACK_RESPONSE, "{question}");
        }

        let answer = answer_question("My EMI feels too high", &figures);
        assert!(answer.response.contains("7 months"));
        let answer = answer_question("How do I clear two loans?", &figures);
        assert!(answer.response.contains("7 months"));
    }

    #[test]
    fn unknown_question_falls_back() {
        let answer = answer_question("What is the weather?", &ProfileFigures::default());
        assert_eq!(answer.response, FALLBACK_RESPONSE);
        assert!(answer.actions.is_empty());
    }
}
