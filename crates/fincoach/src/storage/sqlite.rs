use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, ToSql};

use crate::finance::accounts::{UserId, UserRecord};
use crate::finance::decisions::{DecisionId, FinancialDecision};
use crate::finance::profile::{FinancialProfile, HealthScores, HistoricalSnapshot, ProfileFigures};
use crate::finance::repository::{
    DecisionRepository, ProfileRepository, RepositoryError, ScenarioRepository, UserRepository,
};
use crate::finance::scenarios::{ScenarioConfig, ScenarioId};

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users(
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    name TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS financial_profiles(
    user_id TEXT PRIMARY KEY,
    monthly_salary REAL NOT NULL DEFAULT 0,
    freelance_income REAL NOT NULL DEFAULT 0,
    rent REAL NOT NULL DEFAULT 0,
    utilities REAL NOT NULL DEFAULT 0,
    groceries REAL NOT NULL DEFAULT 0,
    subscriptions REAL NOT NULL DEFAULT 0,
    miscellaneous REAL NOT NULL DEFAULT 0,
    total_debt REAL NOT NULL DEFAULT 0,
    monthly_emi REAL NOT NULL DEFAULT 0,
    emergency_fund REAL NOT NULL DEFAULT 0,
    other_savings REAL NOT NULL DEFAULT 0,
    sip_monthly REAL NOT NULL DEFAULT 0,
    lump_sum_investment REAL NOT NULL DEFAULT 0,
    overall_score INTEGER NOT NULL DEFAULT 0,
    emergency_fund_score INTEGER NOT NULL DEFAULT 0,
    debt_ratio_score INTEGER NOT NULL DEFAULT 0,
    investment_allocation_score INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL,
    FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS historical_snapshots(
    user_id TEXT NOT NULL,
    month TEXT NOT NULL,
    monthly_salary REAL NOT NULL,
    freelance_income REAL NOT NULL,
    rent REAL NOT NULL,
    utilities REAL NOT NULL,
    groceries REAL NOT NULL,
    subscriptions REAL NOT NULL,
    miscellaneous REAL NOT NULL,
    total_debt REAL NOT NULL,
    monthly_emi REAL NOT NULL,
    emergency_fund REAL NOT NULL,
    other_savings REAL NOT NULL,
    sip_monthly REAL NOT NULL,
    lump_sum_investment REAL NOT NULL,
    recorded_at TEXT NOT NULL,
    PRIMARY KEY(user_id, month),
    FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS financial_decisions(
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    amount REAL NOT NULL,
    date TEXT NOT NULL,
    category TEXT NOT NULL,
    alternative_option TEXT,
    expected_return REAL,
    created_at TEXT NOT NULL,
    FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_decisions_owner ON financial_decisions(user_id, date);

CREATE TABLE IF NOT EXISTS scenarios(
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    new_rent REAL,
    job_switch_salary REAL,
    sip_investment REAL,
    expense_growth_rate REAL,
    projection_timeframe INTEGER NOT NULL,
    one_time_expense REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_scenarios_owner ON scenarios(user_id, created_at);
"#;

const FIGURE_COLUMNS: &str = "monthly_salary, freelance_income, rent, utilities, groceries, \
     subscriptions, miscellaneous, total_debt, monthly_emi, emergency_fund, other_savings, \
     sip_monthly, lump_sum_investment";

const DECISION_COLUMNS: &str =
    "id, user_id, title, amount, date, category, alternative_option, expected_return, created_at";

const SCENARIO_COLUMNS: &str = "id, user_id, name, new_rent, job_switch_salary, sip_investment, \
     expense_growth_rate, projection_timeframe, one_time_expense, created_at, updated_at";

/// SQLite-backed store implementing every finance repository over one connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path.as_ref()).map_err(storage_error)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA).map_err(storage_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection lock poisoned".to_string()))
    }
}

fn storage_error(err: rusqlite::Error) -> RepositoryError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => RepositoryError::Conflict,
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

fn figure_params(figures: &ProfileFigures) -> [&dyn ToSql; 13] {
    [
        &figures.monthly_salary,
        &figures.freelance_income,
        &figures.rent,
        &figures.utilities,
        &figures.groceries,
        &figures.subscriptions,
        &figures.miscellaneous,
        &figures.total_debt,
        &figures.monthly_emi,
        &figures.emergency_fund,
        &figures.other_savings,
        &figures.sip_monthly,
        &figures.lump_sum_investment,
    ]
}

/// Reads the thirteen figure columns starting at `offset`.
fn figures_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<ProfileFigures> {
    Ok(ProfileFigures {
        monthly_salary: row.get(offset)?,
        freelance_income: row.get(offset + 1)?,
        rent: row.get(offset + 2)?,
        utilities: row.get(offset + 3)?,
        groceries: row.get(offset + 4)?,
        subscriptions: row.get(offset + 5)?,
        miscellaneous: row.get(offset + 6)?,
        total_debt: row.get(offset + 7)?,
        monthly_emi: row.get(offset + 8)?,
        emergency_fund: row.get(offset + 9)?,
        other_savings: row.get(offset + 10)?,
        sip_monthly: row.get(offset + 11)?,
        lump_sum_investment: row.get(offset + 12)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<FinancialProfile> {
    Ok(FinancialProfile {
        user_id: UserId(row.get(0)?),
        figures: figures_from_row(row, 1)?,
        scores: HealthScores {
            overall_score: row.get(14)?,
            emergency_fund_score: row.get(15)?,
            debt_ratio_score: row.get(16)?,
            investment_allocation_score: row.get(17)?,
        },
        updated_at: row.get(18)?,
    })
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<HistoricalSnapshot> {
    Ok(HistoricalSnapshot {
        user_id: UserId(row.get(0)?),
        month: row.get(1)?,
        figures: figures_from_row(row, 2)?,
        recorded_at: row.get(15)?,
    })
}

fn decision_from_row(row: &Row<'_>) -> rusqlite::Result<FinancialDecision> {
    Ok(FinancialDecision {
        id: DecisionId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        category: row.get(5)?,
        alternative_option: row.get(6)?,
        expected_return: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn scenario_from_row(row: &Row<'_>) -> rusqlite::Result<ScenarioConfig> {
    Ok(ScenarioConfig {
        id: ScenarioId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        name: row.get(2)?,
        new_rent: row.get(3)?,
        job_switch_salary: row.get(4)?,
        sip_investment: row.get(5)?,
        expense_growth_rate: row.get(6)?,
        projection_timeframe: row.get(7)?,
        one_time_expense: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl UserRepository for SqliteStore {
    fn create_user(
        &self,
        user: UserRecord,
        profile: FinancialProfile,
    ) -> Result<UserRecord, RepositoryError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction().map_err(storage_error)?;

        tx.execute(
            "INSERT INTO users (id, email, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id.0, user.email, user.name, user.created_at],
        )
        .map_err(storage_error)?;
        tx.execute(
            "INSERT INTO financial_profiles (user_id, updated_at) VALUES (?1, ?2)",
            params![profile.user_id.0, profile.updated_at],
        )
        .map_err(storage_error)?;

        tx.commit().map_err(storage_error)?;
        Ok(user)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT id, email, name, created_at FROM users WHERE id = ?1",
            params![id.0],
            |row| {
                Ok(UserRecord {
                    id: UserId(row.get(0)?),
                    email: row.get(1)?,
                    name: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(storage_error)
    }
}

impl ProfileRepository for SqliteStore {
    fn fetch_profile(&self, owner: &UserId) -> Result<Option<FinancialProfile>, RepositoryError> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT user_id, {FIGURE_COLUMNS}, overall_score, emergency_fund_score, \
             debt_ratio_score, investment_allocation_score, updated_at \
             FROM financial_profiles WHERE user_id = ?1"
        );
        conn.query_row(&sql, params![owner.0], profile_from_row)
            .optional()
            .map_err(storage_error)
    }

    fn save_profile(&self, profile: &FinancialProfile) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let sql = format!(
            "INSERT OR REPLACE INTO financial_profiles (user_id, {FIGURE_COLUMNS}, overall_score, \
             emergency_fund_score, debt_ratio_score, investment_allocation_score, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
             ?18, ?19)"
        );

        let scores: [&dyn ToSql; 4] = [
            &profile.scores.overall_score,
            &profile.scores.emergency_fund_score,
            &profile.scores.debt_ratio_score,
            &profile.scores.investment_allocation_score,
        ];
        let mut values: Vec<&dyn ToSql> = vec![&profile.user_id.0];
        values.extend(figure_params(&profile.figures));
        values.extend(scores);
        values.push(&profile.updated_at);

        conn.execute(&sql, values.as_slice())
            .map_err(storage_error)?;
        Ok(())
    }

    fn upsert_snapshot(&self, snapshot: &HistoricalSnapshot) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let sql = format!(
            "INSERT OR REPLACE INTO historical_snapshots (user_id, month, {FIGURE_COLUMNS}, \
             recorded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, \
             ?15, ?16)"
        );

        let mut values: Vec<&dyn ToSql> = vec![&snapshot.user_id.0, &snapshot.month];
        values.extend(figure_params(&snapshot.figures));
        values.push(&snapshot.recorded_at);

        conn.execute(&sql, values.as_slice())
            .map_err(storage_error)?;
        Ok(())
    }

    fn snapshots(&self, owner: &UserId) -> Result<Vec<HistoricalSnapshot>, RepositoryError> {
        let conn = self.connection()?;
        let sql = format!(
            "SELECT user_id, month, {FIGURE_COLUMNS}, recorded_at FROM historical_snapshots \
             WHERE user_id = ?1 ORDER BY month ASC"
        );
        let mut stmt = conn.prepare(&sql).map_err(storage_error)?;
        let rows = stmt
            .query_map(params![owner.0], snapshot_from_row)
            .map_err(storage_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage_error)
    }
}

impl DecisionRepository for SqliteStore {
    fn insert_decision(
        &self,
        decision: FinancialDecision,
    ) -> Result<FinancialDecision, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            &format!(
                "INSERT INTO financial_decisions ({DECISION_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
            ),
            params![
                decision.id.0,
                decision.user_id.0,
                decision.title,
                decision.amount,
                decision.date,
                decision.category,
                decision.alternative_option,
                decision.expected_return,
                decision.created_at,
            ],
        )
        .map_err(storage_error)?;
        Ok(decision)
    }

    fn decisions(&self, owner: &UserId) -> Result<Vec<FinancialDecision>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {DECISION_COLUMNS} FROM financial_decisions WHERE user_id = ?1 \
                 ORDER BY date DESC, created_at DESC"
            ))
            .map_err(storage_error)?;
        let rows = stmt
            .query_map(params![owner.0], decision_from_row)
            .map_err(storage_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage_error)
    }

    fn fetch_decision(
        &self,
        owner: &UserId,
        id: &DecisionId,
    ) -> Result<Option<FinancialDecision>, RepositoryError> {
        let conn = self.connection()?;
        conn.query_row(
            &format!(
                "SELECT {DECISION_COLUMNS} FROM financial_decisions WHERE id = ?1 AND user_id = ?2"
            ),
            params![id.0, owner.0],
            decision_from_row,
        )
        .optional()
        .map_err(storage_error)
    }

    fn update_decision(&self, decision: &FinancialDecision) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let changed = conn
            .execute(
                "UPDATE financial_decisions SET title = ?1, amount = ?2, date = ?3, category = ?4, \
                 alternative_option = ?5, expected_return = ?6 WHERE id = ?7 AND user_id = ?8",
                params![
                    decision.title,
                    decision.amount,
                    decision.date,
                    decision.category,
                    decision.alternative_option,
                    decision.expected_return,
                    decision.id.0,
                    decision.user_id.0,
                ],
            )
            .map_err(storage_error)?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_decision(&self, owner: &UserId, id: &DecisionId) -> Result<bool, RepositoryError> {
        let conn = self.connection()?;
        let removed = conn
            .execute(
                "DELETE FROM financial_decisions WHERE id = ?1 AND user_id = ?2",
                params![id.0, owner.0],
            )
            .map_err(storage_error)?;
        Ok(removed > 0)
    }
}

impl ScenarioRepository for SqliteStore {
    fn insert_scenario(
        &self,
        scenario: ScenarioConfig,
    ) -> Result<ScenarioConfig, RepositoryError> {
        let conn = self.connection()?;
        conn.execute(
            &format!(
                "INSERT INTO scenarios ({SCENARIO_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                scenario.id.0,
                scenario.user_id.0,
                scenario.name,
                scenario.new_rent,
                scenario.job_switch_salary,
                scenario.sip_investment,
                scenario.expense_growth_rate,
                scenario.projection_timeframe,
                scenario.one_time_expense,
                scenario.created_at,
                scenario.updated_at,
            ],
        )
        .map_err(storage_error)?;
        Ok(scenario)
    }

    fn scenarios(&self, owner: &UserId) -> Result<Vec<ScenarioConfig>, RepositoryError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SCENARIO_COLUMNS} FROM scenarios WHERE user_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC"
            ))
            .map_err(storage_error)?;
        let rows = stmt
            .query_map(params![owner.0], scenario_from_row)
            .map_err(storage_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage_error)
    }

    fn fetch_scenario(
        &self,
        owner: &UserId,
        id: &ScenarioId,
    ) -> Result<Option<ScenarioConfig>, RepositoryError> {
        let conn = self.connection()?;
        conn.query_row(
            &format!("SELECT {SCENARIO_COLUMNS} FROM scenarios WHERE id = ?1 AND user_id = ?2"),
            params![id.0, owner.0],
            scenario_from_row,
        )
        .optional()
        .map_err(storage_error)
    }

    fn update_scenario(&self, scenario: &ScenarioConfig) -> Result<(), RepositoryError> {
        let conn = self.connection()?;
        let changed = conn
            .execute(
                "UPDATE scenarios SET name = ?1, new_rent = ?2, job_switch_salary = ?3, \
                 sip_investment = ?4, expense_growth_rate = ?5, projection_timeframe = ?6, \
                 one_time_expense = ?7, updated_at = ?8 WHERE id = ?9 AND user_id = ?10",
                params![
                    scenario.name,
                    scenario.new_rent,
                    scenario.job_switch_salary,
                    scenario.sip_investment,
                    scenario.expense_growth_rate,
                    scenario.projection_timeframe,
                    scenario.one_time_expense,
                    scenario.updated_at,
                    scenario.id.0,
                    scenario.user_id.0,
                ],
            )
            .map_err(storage_error)?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_scenario(&self, owner: &UserId, id: &ScenarioId) -> Result<bool, RepositoryError> {
        let conn = self.connection()?;
        let removed = conn
            .execute(
                "DELETE FROM scenarios WHERE id = ?1 AND user_id = ?2",
                params![id.0, owner.0],
            )
            .map_err(storage_error)?;
        Ok(removed > 0)
    }
}
