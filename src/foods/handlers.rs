use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, FoodError},
    foods::{
        dto::{
            ClassifiedFoodResponse, ClassifyItem, DashboardResponse, EmailParams, ExpiryView,
            FeaturedParams, FoodRequest, FoodsRequest, NotePermission, OwnerParams, PageResponse,
            SummaryResponse, ViewParams,
        },
        expiry::{countdown, parse_record_expiry, Countdown},
        repo_types::{FoodCategory, FoodRecord},
        services::{
            self, build_view, classify_all, owned_by, summarize, ClassifiedFood, SortDirection,
            SortKey, ViewQuery,
        },
    },
    state::AppState,
};

const DASHBOARD_RECENT: usize = 6;
const DASHBOARD_EXPIRING: usize = 4;

pub fn freshness_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/classify", post(classify_foods))
        .route("/foods/summary", post(summarize_foods))
        .route("/foods/countdown", post(food_countdown))
}

pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/foods/view", post(view_foods))
        .route("/foods/dashboard", post(dashboard))
        .route("/foods/featured", post(featured_foods))
        .route("/foods/note-permission", post(note_permission))
        .route("/health", get(|| async { "ok" }))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email.trim())
}

fn checked_email(email: &str) -> Result<&str, FoodError> {
    if is_valid_email(email) {
        Ok(email)
    } else {
        warn!(%email, "invalid email");
        Err(FoodError::InvalidArgument(format!("invalid email '{email}'")))
    }
}

fn with_status(item: ClassifiedFood<'_>) -> ClassifiedFoodResponse {
    ClassifiedFoodResponse {
        food: item.record.clone(),
        expiry: ExpiryView::from(item.status),
    }
}

#[instrument(skip(state, body), fields(count = body.foods.len()))]
pub async fn classify_foods(
    State(state): State<AppState>,
    Json(body): Json<FoodsRequest>,
) -> Result<Json<Vec<ClassifyItem>>, AppError> {
    let now = state.reference_instant(body.now);
    let items = classify_all(&body.foods, now)
        .into_iter()
        .map(|(record, status)| ClassifyItem {
            id: record.id.clone(),
            expiry: ExpiryView::from(&status),
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, body), fields(count = body.foods.len()))]
pub async fn summarize_foods(
    State(state): State<AppState>,
    Json(body): Json<FoodsRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let now = state.reference_instant(body.now);
    let summary = summarize(&body.foods, now);
    info!(
        total = summary.counts.total,
        invalid = summary.invalid.len(),
        "summarized foods"
    );
    Ok(Json(summary.into()))
}

/// `null` once the expiry day is over.
#[instrument(skip(state, body), fields(id = %body.food.id))]
pub async fn food_countdown(
    State(state): State<AppState>,
    Json(body): Json<FoodRequest>,
) -> Result<Json<Option<Countdown>>, AppError> {
    let now = state.reference_instant(body.now);
    let expiry = parse_record_expiry(&body.food)?;
    Ok(Json(countdown(&expiry, now)))
}

fn view_query(params: ViewParams, default_page_size: usize) -> Result<ViewQuery, FoodError> {
    let owner = params
        .owner
        .as_deref()
        .map(checked_email)
        .transpose()?
        .map(str::to_string);
    let category = params
        .category
        .filter(|c| !c.trim().is_empty())
        .map(|c| FoodCategory::from_label(&c));
    let sort = match (params.sort.as_deref(), params.order.as_deref()) {
        (Some(key), order) => Some((
            key.parse::<SortKey>()?,
            order.map(str::parse::<SortDirection>).transpose()?.unwrap_or_default(),
        )),
        (None, Some(_)) => {
            return Err(FoodError::InvalidArgument("order given without sort".into()));
        }
        (None, None) => None,
    };

    Ok(ViewQuery {
        owner,
        category,
        search: params.q,
        sort,
        page: params.page.unwrap_or(1),
        page_size: params.page_size.unwrap_or(default_page_size),
    })
}

#[instrument(skip(state, body), fields(count = body.foods.len()))]
pub async fn view_foods(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
    Json(body): Json<FoodsRequest>,
) -> Result<Json<PageResponse<ClassifiedFoodResponse>>, AppError> {
    let now = state.reference_instant(body.now);
    let query = view_query(params, state.config.page_size)?;
    let page = build_view(&body.foods, now, &query)?;

    let items = page
        .items
        .into_iter()
        .map(|item| ClassifiedFoodResponse {
            food: item.record.clone(),
            expiry: ExpiryView::from(&item.status),
        })
        .collect();
    Ok(Json(PageResponse {
        items,
        page: page.page,
        page_size: page.page_size,
        total: page.total,
        total_pages: page.total_pages,
    }))
}

#[instrument(skip(state, body), fields(count = body.foods.len()))]
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
    Json(body): Json<FoodsRequest>,
) -> Result<Json<DashboardResponse>, AppError> {
    let now = state.reference_instant(body.now);
    let foods: Vec<&FoodRecord> = match params.owner.as_deref() {
        Some(owner) => owned_by(&body.foods, checked_email(owner)?),
        None => body.foods.iter().collect(),
    };

    let recent = classify_all(services::recent(foods.iter().copied(), DASHBOARD_RECENT), now)
        .into_iter()
        .map(|(record, status)| ClassifiedFoodResponse {
            food: record.clone(),
            expiry: ExpiryView::from(&status),
        })
        .collect();
    let expiring_soon = services::expiring_soon(foods.iter().copied(), now, DASHBOARD_EXPIRING)
        .into_iter()
        .map(with_status)
        .collect();

    Ok(Json(DashboardResponse {
        summary: summarize(foods, now).into(),
        recent,
        expiring_soon,
    }))
}

#[instrument(skip(state, body), fields(count = body.foods.len()))]
pub async fn featured_foods(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
    Json(body): Json<FoodsRequest>,
) -> Result<Json<Vec<ClassifiedFoodResponse>>, AppError> {
    let now = state.reference_instant(body.now);
    let limit = params.limit.unwrap_or(state.config.featured_limit);
    let mut rng = rand::thread_rng();
    let picks = services::featured(&body.foods, now, limit, &mut rng)
        .into_iter()
        .map(with_status)
        .collect();
    Ok(Json(picks))
}

#[instrument(skip(body), fields(id = %body.food.id))]
pub async fn note_permission(
    Query(params): Query<EmailParams>,
    Json(body): Json<FoodRequest>,
) -> Result<Json<NotePermission>, AppError> {
    let email = checked_email(&params.email)?;
    Ok(Json(NotePermission {
        allowed: services::can_attach_note(&body.food, email),
    }))
}
