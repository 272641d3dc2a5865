use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use market_sim::{
    catalog, CatalogEntry, Instrument, Order, OrderBook, Series, ShapeParams, Side, Tape, TimeRange,
    Trade,
};
use runtime::{EventSink, QueryState, RuntimeEvent, Selection, SelectionUpdate};
use serde::{Deserialize, Serialize};
use ui::ChartLayout;

use crate::{error::ApiError, state::AppState, ws};

const DEFAULT_CHART_WIDTH: f64 = 320.0;
const DEFAULT_CHART_HEIGHT: f64 = 180.0;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles))
        .route("/static/app.js", get(script))
        .route("/instruments", get(instruments))
        .route("/ranges", get(ranges))
        .route("/selection", get(get_selection).put(put_selection))
        .route("/market/series", get(series))
        .route("/market/book", get(book))
        .route("/market/tape", get(tape))
        .route("/market/book/rows", get(book_rows))
        .route("/market/tape/rows", get(tape_rows))
        .route("/market/summary", get(summary))
        .route("/market/chart", get(chart))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], ui::styles_css())
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], ui::app_js())
}

async fn instruments() -> Json<Vec<CatalogEntry>> {
    Json(catalog())
}

#[derive(Debug, Serialize)]
struct RangeInfo {
    range: TimeRange,
    #[serde(flatten)]
    shape: ShapeParams,
}

async fn ranges() -> Json<Vec<RangeInfo>> {
    let ranges = TimeRange::ALL
        .into_iter()
        .map(|range| RangeInfo {
            range,
            shape: range.shape(),
        })
        .collect();
    Json(ranges)
}

async fn get_selection(State(state): State<AppState>) -> Json<Selection> {
    let selection = state.lock().selection();
    Json(selection)
}

/// Applies a partial selection and immediately creates whatever the new
/// keys are missing, series first so book and tape anchor on it.
async fn put_selection(
    State(state): State<AppState>,
    payload: Result<Json<SelectionUpdate>, JsonRejection>,
) -> Result<Json<Selection>, ApiError> {
    let Json(update) =
        payload.map_err(|rejection| ApiError::InvalidSelection(rejection.body_text()))?;

    let (selection, events) = {
        let mut engine = state.lock();
        let next = update.apply(engine.selection());
        let events: Vec<RuntimeEvent> = engine
            .select(next)
            .into_iter()
            .map(|dataset| engine.refresh(dataset))
            .collect();
        (engine.selection(), events)
    };

    for event in &events {
        state.publish(event);
    }
    Ok(Json(selection))
}

async fn series(State(state): State<AppState>) -> Json<QueryState<Series>> {
    let query = state.lock().series_query();
    Json(query)
}

async fn book(State(state): State<AppState>) -> Json<QueryState<OrderBook>> {
    let query = state.lock().book_query();
    Json(query)
}

async fn tape(State(state): State<AppState>) -> Json<QueryState<Tape>> {
    let query = state.lock().tape_query();
    Json(query)
}

/// One book level or trade, formatted for display.
#[derive(Debug, Serialize)]
struct DisplayRow {
    id: String,
    side: Side,
    price: String,
    amount: String,
    time: String,
}

impl From<&Order> for DisplayRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            side: order.side,
            price: ui::format_price(order.price),
            amount: ui::format_amount(order.amount),
            time: ui::format_timestamp(order.timestamp),
        }
    }
}

impl From<&Trade> for DisplayRow {
    fn from(trade: &Trade) -> Self {
        Self {
            id: trade.id.clone(),
            side: trade.side,
            price: ui::format_price(trade.price),
            amount: ui::format_amount(trade.amount),
            time: ui::format_timestamp(trade.timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
struct BookRows {
    buys: Vec<DisplayRow>,
    sells: Vec<DisplayRow>,
}

async fn book_rows(State(state): State<AppState>) -> Json<QueryState<BookRows>> {
    let query = state.lock().book_query();
    let data = query.data.map(|book| BookRows {
        buys: book.buys().iter().map(DisplayRow::from).collect(),
        sells: book.sells().iter().map(DisplayRow::from).collect(),
    });
    Json(QueryState {
        data,
        is_loading: query.is_loading,
    })
}

async fn tape_rows(State(state): State<AppState>) -> Json<QueryState<Vec<DisplayRow>>> {
    let query = state.lock().tape_query();
    let data = query
        .data
        .map(|tape| tape.trades().iter().map(DisplayRow::from).collect());
    Json(QueryState {
        data,
        is_loading: query.is_loading,
    })
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    instrument: Instrument,
    is_loading: bool,
    price: String,
    change: String,
    high: String,
    low: String,
}

async fn summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let (instrument, query) = {
        let engine = state.lock();
        (engine.selection().instrument, engine.series_query())
    };

    let response = match query.data {
        Some(series) => SummaryResponse {
            instrument,
            is_loading: false,
            price: ui::format_price(series.current_price()),
            change: ui::format_percentage(series.percentage_change()),
            high: ui::format_price(series.high()),
            low: ui::format_price(series.low()),
        },
        None => SummaryResponse {
            instrument,
            is_loading: true,
            price: "--".to_string(),
            change: "--".to_string(),
            high: "--".to_string(),
            low: "--".to_string(),
        },
    };
    Json(response)
}

#[derive(Debug, Deserialize)]
struct ChartParams {
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChartResponse {
    is_loading: bool,
    path: String,
    #[serde(flatten)]
    layout: ChartLayout,
}

async fn chart(
    State(state): State<AppState>,
    params: Result<Query<ChartParams>, QueryRejection>,
) -> Result<Json<ChartResponse>, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ApiError::InvalidChartQuery(rejection.body_text()))?;
    let width = params.width.unwrap_or(DEFAULT_CHART_WIDTH);
    let height = params.height.unwrap_or(DEFAULT_CHART_HEIGHT);
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        return Err(ApiError::InvalidChartSize);
    }

    let query = state.lock().series_query();
    let prices: Vec<f64> = query
        .data
        .as_ref()
        .map(|series| series.prices().iter().map(|point| point.price).collect())
        .unwrap_or_default();
    let layout = ChartLayout::compute(&prices, width, height);

    Ok(Json(ChartResponse {
        is_loading: query.is_loading,
        path: layout.svg_path(),
        layout,
    }))
}
