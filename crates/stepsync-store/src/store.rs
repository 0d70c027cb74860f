//! Pool-owning store facade.
//!
//! [`Store`] checks a connection out of the pool per call and delegates to
//! the stateless repositories. It is cheap to clone (the pool is shared),
//! which is how the HTTP layer carries it in application state.

use stepsync_core::models::{
    AiFeedback, Challenge, DanceTutorial, PracticeSession, Submission, User,
};

use crate::connection::ConnectionPool;
use crate::errors::Result;
use crate::repositories::{
    ChallengeRepo, CreateChallengeOptions, CreatePracticeSessionOptions, CreateSubmissionOptions,
    CreateTutorialOptions, FeedbackRepo, ListSessionsOptions, ListSubmissionsOptions,
    ListTutorialsOptions, PracticeSessionRepo, SubmissionRepo, TutorialRepo, UserRepo,
};

/// Facade over all record repositories.
#[derive(Clone)]
pub struct Store {
    pool: ConnectionPool,
}

impl Store {
    /// Wrap an existing pool. Migrations are the caller's responsibility.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    // Users

    /// Create or update a user keyed by `user_id`.
    pub fn upsert_user(&self, user: &User) -> Result<User> {
        UserRepo::upsert(&*self.pool.get()?, user)
    }

    /// Fetch a single user.
    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        UserRepo::get(&*self.pool.get()?, user_id)
    }

    /// List all users ordered by username.
    pub fn list_users(&self) -> Result<Vec<User>> {
        UserRepo::list(&*self.pool.get()?)
    }

    // Tutorials

    /// Insert a new tutorial.
    pub fn create_tutorial(&self, opts: &CreateTutorialOptions<'_>) -> Result<DanceTutorial> {
        TutorialRepo::create(&*self.pool.get()?, opts)
    }

    /// List tutorials with optional filters.
    pub fn list_tutorials(&self, opts: &ListTutorialsOptions<'_>) -> Result<Vec<DanceTutorial>> {
        TutorialRepo::list(&*self.pool.get()?, opts)
    }

    // Challenges

    /// Insert a new challenge.
    pub fn create_challenge(&self, opts: &CreateChallengeOptions<'_>) -> Result<Challenge> {
        ChallengeRepo::create(&*self.pool.get()?, opts)
    }

    /// Fetch a single challenge.
    pub fn get_challenge(&self, challenge_id: &str) -> Result<Option<Challenge>> {
        ChallengeRepo::get(&*self.pool.get()?, challenge_id)
    }

    /// List all challenges, newest first.
    pub fn list_challenges(&self) -> Result<Vec<Challenge>> {
        ChallengeRepo::list(&*self.pool.get()?)
    }

    // Submissions

    /// Insert a new submission.
    pub fn create_submission(&self, opts: &CreateSubmissionOptions<'_>) -> Result<Submission> {
        SubmissionRepo::create(&*self.pool.get()?, opts)
    }

    /// List submissions with optional filters.
    pub fn list_submissions(&self, opts: &ListSubmissionsOptions<'_>) -> Result<Vec<Submission>> {
        SubmissionRepo::list(&*self.pool.get()?, opts)
    }

    // Practice sessions

    /// Insert a new live session.
    pub fn create_session(
        &self,
        opts: &CreatePracticeSessionOptions<'_>,
    ) -> Result<PracticeSession> {
        PracticeSessionRepo::create(&*self.pool.get()?, opts)
    }

    /// Fetch a single session.
    pub fn get_session(&self, session_id: &str) -> Result<Option<PracticeSession>> {
        PracticeSessionRepo::get(&*self.pool.get()?, session_id)
    }

    /// List sessions with optional filters.
    pub fn list_sessions(&self, opts: &ListSessionsOptions<'_>) -> Result<Vec<PracticeSession>> {
        PracticeSessionRepo::list(&*self.pool.get()?, opts)
    }

    /// End a live session.
    pub fn end_session(
        &self,
        session_id: &str,
        recording_url: Option<&str>,
    ) -> Result<PracticeSession> {
        PracticeSessionRepo::end(&*self.pool.get()?, session_id, recording_url)
    }

    // Feedback

    /// Persist a feedback record.
    pub fn insert_feedback(&self, feedback: &AiFeedback) -> Result<()> {
        FeedbackRepo::insert(&*self.pool.get()?, feedback)
    }

    /// List feedback for one session, newest first.
    pub fn list_feedback(&self, session_id: &str) -> Result<Vec<AiFeedback>> {
        FeedbackRepo::list_for_session(&*self.pool.get()?, session_id)
    }
}
