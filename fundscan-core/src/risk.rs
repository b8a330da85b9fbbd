//! Risk scoring engine.
//!
//! A pure function from a fund snapshot plus its news bundle to a risk
//! assessment. Deterministic (timestamp aside), total, and stateless:
//! identical inputs always yield identical score, level, findings, and
//! action items.

use chrono::Utc;
use tracing::debug;

use crate::types::{ExposureMetrics, FundSnapshot, NewsBundle, RiskAssessment, RiskLevel, Sentiment};

/// Base risk level every portfolio starts from.
const BASE_RISK: i64 = 30;

/// Analyze risk exposure for a snapshot and its news bundle.
pub fn analyze_risk(snapshot: &FundSnapshot, news: &NewsBundle) -> RiskAssessment {
    let total_holdings = snapshot.holdings.len() as i64;
    let negative_alerts = count_sentiment(news, Sentiment::Negative);
    let positive_alerts = count_sentiment(news, Sentiment::Positive);

    debug!(
        holdings = total_holdings,
        negative = negative_alerts,
        positive = positive_alerts,
        "Analyzing risk exposure"
    );

    let concentration_risk = ((total_holdings - 5) * 2).clamp(0, 20);
    let news_risk = (negative_alerts * 10).clamp(0, 30);
    let news_benefit = (positive_alerts * 5).clamp(0, 15);

    let risk_score = (BASE_RISK + concentration_risk + news_risk - news_benefit).clamp(0, 100);
    let overall_risk_level = risk_level_for(risk_score);

    let key_findings = build_findings(total_holdings, negative_alerts, positive_alerts, risk_score);
    let action_items = build_action_items(concentration_risk, negative_alerts, risk_score);

    let score = risk_score as f64;
    let exposure_metrics = ExposureMetrics {
        concentration_risk,
        news_sentiment_impact: news_risk - news_benefit,
        volatility_exposure: round1(score * 0.7),
        liquidity_risk: round1(score * 0.3),
        market_risk: round1(score * 0.5),
    };

    RiskAssessment {
        analysis_timestamp: Utc::now().to_rfc3339(),
        overall_risk_level,
        risk_score,
        key_findings,
        action_items,
        exposure_metrics,
    }
}

/// Map a risk score to its level. Half-open ascending thresholds.
pub fn risk_level_for(risk_score: i64) -> RiskLevel {
    if risk_score < 25 {
        RiskLevel::Low
    } else if risk_score < 50 {
        RiskLevel::Medium
    } else if risk_score < 75 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

fn count_sentiment(news: &NewsBundle, sentiment: Sentiment) -> i64 {
    news.alerts.iter().filter(|a| a.sentiment == sentiment).count() as i64
}

/// Three findings, one per rule, in fixed order: diversification, sentiment
/// balance, score-band commentary.
fn build_findings(
    total_holdings: i64,
    negative_alerts: i64,
    positive_alerts: i64,
    risk_score: i64,
) -> Vec<String> {
    let mut findings = Vec::with_capacity(3);

    if total_holdings < 5 {
        findings.push("Portfolio shows low diversification with limited number of holdings".into());
    } else if total_holdings > 15 {
        findings.push("Portfolio may be over-diversified, potentially diluting returns".into());
    } else {
        findings.push("Portfolio shows adequate diversification across holdings".into());
    }

    if negative_alerts > positive_alerts {
        findings.push(
            "Negative news sentiment outweighs positive sentiment for portfolio holdings".into(),
        );
    } else if positive_alerts > negative_alerts {
        findings.push(
            "Positive news sentiment outweighs negative sentiment for portfolio holdings".into(),
        );
    } else {
        findings.push("Neutral news sentiment balance for portfolio holdings".into());
    }

    if risk_score > 70 {
        findings.push("High risk exposure detected, immediate attention recommended".into());
    } else if risk_score > 40 {
        findings.push("Moderate risk exposure detected, monitoring recommended".into());
    } else {
        findings.push("Low risk exposure detected, portfolio appears well-balanced".into());
    }

    findings
}

/// Zero or more action items, each guarded by an independent threshold; the
/// guards are not mutually exclusive.
fn build_action_items(concentration_risk: i64, negative_alerts: i64, risk_score: i64) -> Vec<String> {
    let mut items = Vec::new();

    if concentration_risk > 10 {
        items.push("Consider diversifying portfolio to reduce concentration risk".into());
    }

    if negative_alerts > 2 {
        items.push("Review holdings with negative news sentiment and consider rebalancing".into());
    }

    if risk_score > 50 {
        items.push("Implement risk mitigation strategies for high-risk holdings".into());
        items.push("Consider setting up stop-loss orders for volatile positions".into());
    }

    if risk_score < 30 {
        items.push("Current risk level is low, consider opportunities for strategic growth".into());
    }

    items
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
