//! Dashboard page rendering - Full page and HTMX partial endpoints

use crate::AppState;
use inventoryweb_config::{Config, CurrencyConfig};
use inventoryweb_core::{AccountEntry, AccountSummary, CostAmount, DashboardState, InstanceRecord};
use inventoryweb_utils::{escape_html, format_fixed, format_fixed_f64};

/// Full dashboard page
pub async fn page_dashboard(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;
    let inner_content = render_dashboard_page(&state.dashboard.snapshot(), config);

    axum::response::Html(crate::page_response(&headers, &config.dashboard.title, &inner_content))
}

/// Current view, requested by the view itself while loading
pub async fn htmx_dashboard_view(state: axum::extract::State<AppState>) -> axum::response::Html<String> {
    axum::response::Html(render_dashboard_view(&state.dashboard.snapshot(), &state.config))
}

/// Trigger button target: start an activation, answer with the loading view
pub async fn htmx_dashboard_refresh(state: axum::extract::State<AppState>) -> axum::response::Html<String> {
    // The request runs in its own task so a closed tab does not cancel it.
    drop(state.dashboard.start());
    axum::response::Html(render_dashboard_view(&state.dashboard.snapshot(), &state.config))
}

fn render_dashboard_page(state: &DashboardState, config: &Config) -> String {
    format!(
        r##"<div class="min-h-screen bg-gray-100 p-6">
    <div class="max-w-7xl mx-auto">
        <h1 class="text-3xl font-bold text-center mb-6 text-gray-800">{}</h1>
        <div class="text-center mb-6">
            <button hx-post="/dashboard/refresh" hx-target="#dashboard-view" hx-swap="outerHTML"
                class="bg-blue-600 text-white px-6 py-2 rounded shadow hover:bg-blue-700 transition">{}</button>
        </div>
        {}
    </div>
</div>"##,
        escape_html(&config.dashboard.title),
        escape_html(&config.dashboard.button_label),
        render_dashboard_view(state, config)
    )
}

/// Loading indicator, error banner and account grid for one state
pub fn render_dashboard_view(state: &DashboardState, config: &Config) -> String {
    let mut html = if state.is_loading {
        format!(
            r#"<div id="dashboard-view" hx-get="/dashboard/view" hx-trigger="load delay:{}ms" hx-swap="outerHTML">"#,
            config.dashboard.poll_interval_ms
        )
    } else {
        r#"<div id="dashboard-view">"#.to_string()
    };

    if state.is_loading {
        html.push_str(r#"<p id="loading-indicator" class="text-center text-yellow-500 font-medium">Loading...</p>"#);
    }

    if let Some(message) = &state.error_message {
        html.push_str(&format!(
            r#"<p id="error-banner" class="text-center text-red-600 font-medium">Error: {}</p>"#,
            escape_html(message)
        ));
    }

    if let Some(payload) = &state.result {
        html.push_str(r#"<div id="account-grid" class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">"#);
        for entry in payload.accounts() {
            html.push_str(&render_account_card(entry, &config.currency));
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

/// One account card: heading, instance table or placeholder, cost line
pub fn render_account_card(entry: &AccountEntry, currency: &CurrencyConfig) -> String {
    let summary = &entry.summary;

    let account_error = summary
        .error
        .as_deref()
        .map(|e| format!(r#"<p class="text-sm text-red-600 mb-4">{}</p>"#, escape_html(e)))
        .unwrap_or_default();

    let instances = summary.instances();
    let body = if instances.is_empty() {
        let ec2_error = summary
            .ec2_error()
            .map(|e| format!(r#"<p class="text-xs text-red-500 mt-1">{}</p>"#, escape_html(e)))
            .unwrap_or_default();
        format!(r#"<p class="text-gray-500 italic">No EC2 instances</p>{}"#, ec2_error)
    } else {
        render_instance_table(instances)
    };

    format!(
        r#"<div class="bg-white rounded-lg shadow-md p-5 border border-gray-200">
    <h2 class="text-xl font-semibold text-blue-700 mb-4">Account: {}</h2>
    {}
    <div>
        <h3 class="text-md font-semibold text-gray-600 mb-2">EC2 Instances</h3>
        {}
    </div>
    <div class="mt-6 text-right text-sm font-bold text-green-600">Total Cost: {}</div>
</div>"#,
        escape_html(&entry.account_id),
        account_error,
        body,
        escape_html(&format_cost(summary, currency))
    )
}

fn render_instance_table(instances: &[InstanceRecord]) -> String {
    let rows: String = instances
        .iter()
        .map(|instance| {
            format!(
                r#"<tr class="hover:bg-gray-50"><td class="border px-2 py-1">{}</td><td class="border px-2 py-1">{}</td><td class="border px-2 py-1">{}</td><td class="border px-2 py-1">{}</td></tr>"#,
                escape_html(&instance.instance_id),
                escape_html(&instance.instance_type),
                escape_html(&instance.state),
                escape_html(&instance.region)
            )
        })
        .collect();

    format!(
        r#"<table class="w-full text-sm border">
            <thead>
                <tr class="bg-gray-100 text-left">
                    <th class="border px-2 py-1">Instance ID</th>
                    <th class="border px-2 py-1">Type</th>
                    <th class="border px-2 py-1">State</th>
                    <th class="border px-2 py-1">Region</th>
                </tr>
            </thead>
            <tbody>{}</tbody>
        </table>"#,
        rows
    )
}

/// Cost with currency symbol; `NaN` when the payload has no usable number
fn format_cost(summary: &AccountSummary, currency: &CurrencyConfig) -> String {
    let amount = match summary.cost_amount() {
        Some(CostAmount::Exact(value)) => format_fixed(value, currency.decimal_places),
        Some(CostAmount::Approximate(value)) => format_fixed_f64(value, currency.decimal_places),
        None => "NaN".to_string(),
    };
    format!("{}{}", currency.symbol, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventoryweb_core::InventoryPayload;

    const SAMPLE: &str = r#"{"111111111111":{"EC2":[{"InstanceId":"i-1","InstanceType":"t2.micro","State":"running","Region":"us-east-1"}],"CostUSD":"12.345"}}"#;

    fn loaded(body: &str) -> DashboardState {
        DashboardState {
            result: Some(InventoryPayload::from_json(body).unwrap()),
            ..Default::default()
        }
    }

    fn row_count(html: &str) -> usize {
        html.matches(r#"<tr class="hover:bg-gray-50">"#).count()
    }

    #[test]
    fn test_initial_view_is_empty() {
        let html = render_dashboard_view(&DashboardState::default(), &Config::default());
        assert_eq!(html, r#"<div id="dashboard-view"></div>"#);
    }

    #[test]
    fn test_loading_view_polls() {
        let state = DashboardState {
            is_loading: true,
            ..Default::default()
        };
        let html = render_dashboard_view(&state, &Config::default());
        assert!(html.contains(">Loading...</p>"));
        assert!(html.contains(r#"hx-trigger="load delay:500ms""#));
        assert!(!html.contains("error-banner"));
        assert!(!html.contains("account-grid"));
    }

    #[test]
    fn test_sample_payload_card() {
        let html = render_dashboard_view(&loaded(SAMPLE), &Config::default());

        assert!(!html.contains("loading-indicator"));
        assert_eq!(html.matches("Account: ").count(), 1);
        assert!(html.contains("Account: 111111111111</h2>"));
        assert_eq!(row_count(&html), 1);
        assert!(html.contains(
            r#"<td class="border px-2 py-1">i-1</td><td class="border px-2 py-1">t2.micro</td><td class="border px-2 py-1">running</td><td class="border px-2 py-1">us-east-1</td>"#
        ));
        assert!(html.contains("Total Cost: $12.35</div>"));
    }

    #[test]
    fn test_empty_instances_show_placeholder() {
        let html = render_dashboard_view(&loaded(r#"{"1":{"EC2":[],"CostUSD":"0"}}"#), &Config::default());
        assert!(html.contains("No EC2 instances"));
        assert!(!html.contains("<table"));
        assert!(html.contains("Total Cost: $0.00"));
    }

    #[test]
    fn test_missing_ec2_shows_placeholder() {
        let html = render_dashboard_view(&loaded(r#"{"1":{"CostUSD":"5"}}"#), &Config::default());
        assert!(html.contains("No EC2 instances"));
    }

    #[test]
    fn test_error_view() {
        let state = DashboardState {
            error_message: Some("API call failed with status 500".to_string()),
            ..Default::default()
        };
        let html = render_dashboard_view(&state, &Config::default());
        assert!(html.contains(">Error: API call failed with status 500</p>"));
        assert!(!html.contains("account-grid"));
    }

    #[test]
    fn test_rows_keep_payload_order() {
        let body = r#"{"1":{"EC2":[
            {"InstanceId":"i-z","InstanceType":"m5.large","State":"running","Region":"us-west-2"},
            {"InstanceId":"i-a","InstanceType":"m5.large","State":"stopped","Region":"us-west-2"}
        ],"CostUSD":"1"}}"#;
        let html = render_dashboard_view(&loaded(body), &Config::default());
        assert_eq!(row_count(&html), 2);
        let z = html.find(">i-z<").unwrap();
        let a = html.find(">i-a<").unwrap();
        assert!(z < a);
    }

    #[test]
    fn test_non_numeric_cost_renders_nan() {
        let html = render_dashboard_view(
            &loaded(r#"{"1":{"EC2":[],"CostUSD":"Cost Error: denied"},"2":{"EC2":[]}}"#),
            &Config::default(),
        );
        assert_eq!(html.matches("Total Cost: $NaN").count(), 2);
    }

    #[test]
    fn test_numeric_cost_is_rounded() {
        let html = render_dashboard_view(&loaded(r#"{"1":{"EC2":[],"CostUSD":12.345}}"#), &Config::default());
        assert!(html.contains("Total Cost: $12.35</div>"));
    }

    #[test]
    fn test_cost_beyond_decimal_range_still_renders() {
        let html = render_dashboard_view(
            &loaded(r#"{"1":{"EC2":[],"CostUSD":"123456789012345678901234567890"}}"#),
            &Config::default(),
        );
        assert!(html.contains("Total Cost: $123456789012345"));
        assert!(!html.contains("NaN"));
    }

    #[test]
    fn test_oddly_typed_fields_render_per_card() {
        let body = r#"{"1":{"EC2":{},"CostUSD":true},"2":{"EC2":[{"InstanceId":"i-2","InstanceType":"t3.micro","State":null,"Region":"eu-west-1"}],"CostUSD":"4"}}"#;
        let html = render_dashboard_view(&loaded(body), &Config::default());
        assert!(!html.contains("error-banner"));
        assert_eq!(html.matches("Account: ").count(), 2);
        assert!(html.contains("No EC2 instances"));
        assert!(html.contains("Total Cost: $NaN"));
        assert!(html.contains(r#"<td class="border px-2 py-1">t3.micro</td><td class="border px-2 py-1"></td>"#));
        assert!(html.contains("Total Cost: $4.00"));
    }

    #[test]
    fn test_collector_errors_are_shown() {
        let body = r#"{"1":{"error":"AccessDenied"},"2":{"EC2":{"error":"UnauthorizedOperation"},"CostUSD":"3"}}"#;
        let html = render_dashboard_view(&loaded(body), &Config::default());
        assert!(html.contains(">AccessDenied</p>"));
        assert!(html.contains(">UnauthorizedOperation</p>"));
        assert_eq!(html.matches("No EC2 instances").count(), 2);
    }

    #[test]
    fn test_payload_text_is_escaped() {
        let body = r#"{"<b>1</b>":{"EC2":[{"InstanceId":"<script>x</script>","InstanceType":"t","State":"s","Region":"r"}]}}"#;
        let html = render_dashboard_view(&loaded(body), &Config::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("Account: &lt;b&gt;1&lt;/b&gt;"));
    }

    #[test]
    fn test_currency_config_applies() {
        let mut config = Config::default();
        config.currency.symbol = "€".to_string();
        config.currency.decimal_places = 3;
        let html = render_dashboard_view(&loaded(SAMPLE), &config);
        assert!(html.contains("Total Cost: €12.345"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let state = loaded(SAMPLE);
        let config = Config::default();
        assert_eq!(render_dashboard_view(&state, &config), render_dashboard_view(&state, &config));
    }

    #[test]
    fn test_full_page_contains_view() {
        let html = render_dashboard_page(&DashboardState::default(), &Config::default());
        assert!(html.contains(">AWS Inventory Dashboard</h1>"));
        assert!(html.contains(">Call Lambda API</button>"));
        assert!(html.contains(r#"<div id="dashboard-view"></div>"#));
    }
}
