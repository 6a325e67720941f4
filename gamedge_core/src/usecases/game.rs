//! Single game lookups and the game info aggregate

use crate::Result;
use crate::data::LikedGamesLocalDataStore;
use crate::domain::{Company, Game, Pagination};
use crate::error::Error;
use crate::refresh::Refresh;
use crate::usecases::GamesContext;
use log::warn;
use std::sync::Arc;

/// Local lookup by id; a miss is [`Error::NotFound`]
pub struct GetGameUseCase {
    context: GamesContext,
}

impl GetGameUseCase {
    pub fn new(context: GamesContext) -> Self {
        Self { context }
    }

    pub async fn execute(&self, game_id: i64) -> Result<Game> {
        self.context
            .local
            .get_game(game_id)
            .await?
            .ok_or_else(|| Error::not_found("Game", game_id))
    }
}

/// Other games by a developer company
///
/// Refreshes the company bucket and falls back to a local read by the
/// company's developed ids when the refresh was throttled.
pub struct GetCompanyDevelopedGamesUseCase {
    context: GamesContext,
}

impl GetCompanyDevelopedGamesUseCase {
    pub fn new(context: GamesContext) -> Self {
        Self { context }
    }

    pub async fn execute(&self, company: &Company, pagination: Pagination) -> Result<Vec<Game>> {
        let context = &self.context;
        let key = context.keys.company_developed_games_key(company, pagination);

        let refreshed = context
            .orchestrator
            .refresh(
                &key,
                context.policies.company_developed_games(),
                context.local.as_ref(),
                || context.remote.company_developed_games(company, pagination),
            )
            .await?;

        match refreshed {
            Refresh::Refreshed(games) => Ok(games),
            Refresh::Skipped => {
                context
                    .local
                    .get_games(&company.developed_games, pagination)
                    .await
            }
        }
    }
}

/// Games similar to a given game, with the same fallback as company games
pub struct GetSimilarGamesUseCase {
    context: GamesContext,
}

impl GetSimilarGamesUseCase {
    pub fn new(context: GamesContext) -> Self {
        Self { context }
    }

    pub async fn execute(&self, game: &Game, pagination: Pagination) -> Result<Vec<Game>> {
        let context = &self.context;
        let key = context.keys.similar_games_key(game, pagination);

        let refreshed = context
            .orchestrator
            .refresh(
                &key,
                context.policies.similar_games(),
                context.local.as_ref(),
                || context.remote.similar_games(game, pagination),
            )
            .await?;

        match refreshed {
            Refresh::Refreshed(games) => Ok(games),
            Refresh::Skipped => context.local.get_games(&game.similar_games, pagination).await,
        }
    }
}

/// Everything the game detail view shows
#[derive(Debug, Clone, PartialEq)]
pub struct GameInfo {
    pub game: Game,
    pub is_liked: bool,
    pub company_games: Vec<Game>,
    pub similar_games: Vec<Game>,
}

/// Combine a game with its like state and related games
pub struct GetGameInfoUseCase {
    context: GamesContext,
    get_game: GetGameUseCase,
    company_games: GetCompanyDevelopedGamesUseCase,
    similar_games: GetSimilarGamesUseCase,
    likes: Arc<dyn LikedGamesLocalDataStore>,
}

impl GetGameInfoUseCase {
    pub fn new(context: GamesContext, likes: Arc<dyn LikedGamesLocalDataStore>) -> Self {
        Self {
            get_game: GetGameUseCase::new(context.clone()),
            company_games: GetCompanyDevelopedGamesUseCase::new(context.clone()),
            similar_games: GetSimilarGamesUseCase::new(context.clone()),
            context,
            likes,
        }
    }

    pub async fn execute(&self, game_id: i64) -> Result<GameInfo> {
        let game = self.get_game.execute(game_id).await?;
        let related = Pagination::default();

        let (is_liked, company_games, similar_games) = futures::join!(
            self.likes.is_game_liked(game_id),
            self.load_company_games(&game, related),
            self.load_similar_games(&game, related),
        );

        Ok(GameInfo {
            is_liked: is_liked?,
            company_games: company_games?,
            similar_games: similar_games?,
            game,
        })
    }

    async fn load_company_games(&self, game: &Game, pagination: Pagination) -> Result<Vec<Game>> {
        let Some(company) = game
            .developer_company()
            .filter(|company| company.has_developed_games())
        else {
            return Ok(Vec::new());
        };

        match self.company_games.execute(company, pagination).await {
            Ok(games) => Ok(games),
            Err(e) => {
                warn!("Showing cached games of company {}: {e}", company.id);
                self.context
                    .local
                    .get_games(&company.developed_games, pagination)
                    .await
            }
        }
    }

    async fn load_similar_games(&self, game: &Game, pagination: Pagination) -> Result<Vec<Game>> {
        if !game.has_similar_games() {
            return Ok(Vec::new());
        }

        match self.similar_games.execute(game, pagination).await {
            Ok(games) => Ok(games),
            Err(e) => {
                warn!("Showing cached similar games of game {}: {e}", game.id);
                self.context
                    .local
                    .get_games(&game.similar_games, pagination)
                    .await
            }
        }
    }
}
