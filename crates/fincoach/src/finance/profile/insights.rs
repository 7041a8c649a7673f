use serde::Serialize;

use super::domain::{HealthScores, ProfileFigures};

/// Scores below this are warnings.
pub const WARNING_BELOW: u8 = 50;
/// Scores at or above this are successes.
pub const SUCCESS_FROM: u8 = 80;
pub const SAVINGS_RATE_WARNING_BELOW: f64 = 0.10;
pub const SAVINGS_RATE_SUCCESS_FROM: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightLevel {
    Warning,
    Info,
    Success,
}

impl InsightLevel {
    pub fn for_score(score: u8) -> Self {
        if score < WARNING_BELOW {
            Self::Warning
        } else if score < SUCCESS_FROM {
            Self::Info
        } else {
            Self::Success
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub category: &'static str,
    pub level: InsightLevel,
    pub message: &'static str,
    pub recommendation: &'static str,
}

struct Advice {
    message: &'static str,
    recommendation: &'static str,
}

struct ScoreBand {
    category: &'static str,
    warning: Advice,
    info: Advice,
    success: Advice,
}

impl ScoreBand {
    fn insight(&self, score: u8) -> Insight {
        let level = InsightLevel::for_score(score);
        let advice = match level {
            InsightLevel::Warning => &self.warning,
            InsightLevel::Info => &self.info,
            InsightLevel::Success => &self.success,
        };
        Insight {
            category: self.category,
            level,
            message: advice.message,
            recommendation: advice.recommendation,
        }
    }
}

const EMERGENCY_FUND: ScoreBand = ScoreBand {
    category: "Emergency Fund",
    warning: Advice {
        message: "Your emergency fund is below the recommended 3-6 months of expenses",
        recommendation: "Try to increase your emergency fund by saving a small amount each month",
    },
    info: Advice {
        message: "Your emergency fund is on track but could be stronger",
        recommendation: "Consider growing your emergency fund to cover 6 months of expenses",
    },
    success: Advice {
        message: "Your emergency fund is well-established",
        recommendation:
            "Your emergency fund is in great shape. Consider investing additional savings",
    },
};

const DEBT_MANAGEMENT: ScoreBand = ScoreBand {
    category: "Debt Management",
    warning: Advice {
        message: "Your debt payments are taking up a significant portion of your income",
        recommendation:
            "Focus on paying down high-interest debt first and consider debt consolidation",
    },
    info: Advice {
        message: "Your debt level is manageable but could be improved",
        recommendation: "Continue making regular payments and avoid taking on new debt",
    },
    success: Advice {
        message: "Your debt ratio is healthy",
        recommendation: "You're maintaining a good debt-to-income ratio. Keep it up!",
    },
};

const INVESTMENTS: ScoreBand = ScoreBand {
    category: "Investments",
    warning: Advice {
        message: "You're investing less than the recommended amount for long-term wealth building",
        recommendation: "Try to increase your monthly SIP contributions, even by a small amount",
    },
    info: Advice {
        message: "Your investment allocation is good but has room for improvement",
        recommendation: "Consider increasing your investments to reach the 20% of income target",
    },
    success: Advice {
        message: "You're investing well for your future",
        recommendation:
            "Great job allocating funds to investments. Consider diversifying if you haven't already",
    },
};

const SAVINGS_CATEGORY: &str = "Savings Rate";

/// Share of income left after expenses. `None` when there is no income to divide by.
pub fn savings_rate(figures: &ProfileFigures) -> Option<f64> {
    let income = figures.total_income();
    if income > 0.0 {
        Some((income - figures.total_expenses()) / income)
    } else {
        None
    }
}

pub fn generate_insights(scores: &HealthScores, figures: &ProfileFigures) -> Vec<Insight> {
    let mut insights = vec![
        EMERGENCY_FUND.insight(scores.emergency_fund_score),
        DEBT_MANAGEMENT.insight(scores.debt_ratio_score),
        INVESTMENTS.insight(scores.investment_allocation_score),
    ];

    match savings_rate(figures) {
        Some(rate) if rate < SAVINGS_RATE_WARNING_BELOW => insights.push(Insight {
            category: SAVINGS_CATEGORY,
            level: InsightLevel::Warning,
            message: "Your savings rate is below 10% of your income",
            recommendation:
                "Look for areas to reduce expenses or increase income to boost your savings rate",
        }),
        Some(rate) if rate >= SAVINGS_RATE_SUCCESS_FROM => insights.push(Insight {
            category: SAVINGS_CATEGORY,
            level: InsightLevel::Success,
            message: "You're saving more than 20% of your income",
            recommendation:
                "Excellent savings rate! Consider allocating some of these savings to investments",
        }),
        _ => {}
    }

    insights
}

/// Scores, insights and the savings rate served by the health-score endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub health_score: HealthScores,
    pub insights: Vec<Insight>,
    pub savings_rate: Option<f64>,
}
