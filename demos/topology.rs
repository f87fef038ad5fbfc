use gpui::prelude::*;
use gpui::{Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use gpui_topology::frame::{EVENT_TIME_END_FIELD, EVENT_TIME_FIELD, VALUE_FIELD};
use gpui_topology::gpui_backend::GpuiTopologyView;
use gpui_topology::{
    Field, FieldConfig, FieldValue, PanelOptions, RawSeries, Theme, Threshold, ThresholdsConfig,
    TimeWindow, TopologyPanel, ValueMapping,
};

const MINUTE: i64 = 60_000;

fn host_series(name: &str, start: i64, states: &[(i64, &str)]) -> RawSeries {
    let status = FieldConfig {
        thresholds: None,
        mappings: vec![ValueMapping::colors([
            ("up", "green"),
            ("degraded", "orange"),
            ("down", "red"),
        ])],
    };
    RawSeries::new(name)
        .with_field(Field::new(
            EVENT_TIME_FIELD,
            states.iter().map(|(offset, _)| start + offset * MINUTE),
        ))
        .with_field(Field::new(VALUE_FIELD, states.iter().map(|(_, state)| *state)).with_config(status))
}

fn load_series(start: i64) -> Vec<RawSeries> {
    let load = FieldConfig {
        thresholds: Some(ThresholdsConfig {
            steps: vec![
                Threshold::base("blue"),
                Threshold::new(50.0, "yellow"),
                Threshold::new(80.0, "red"),
            ],
        }),
        mappings: Vec::new(),
    };
    let mut series = vec![
        host_series(
            "eu-west|rack-1|web-01",
            start,
            &[(0, "up"), (25, "degraded"), (40, "up")],
        ),
        host_series(
            "eu-west|rack-1|web-02",
            start,
            &[(0, "up"), (50, "down"), (55, "up")],
        ),
        host_series("eu-west|rack-2|db-01", start, &[(0, "up")]),
    ];
    series.push(
        RawSeries::new("us-east|rack-7|batch")
            .with_field(Field::new(
                EVENT_TIME_FIELD,
                [5, 20, 45].map(|offset| start + offset * MINUTE),
            ))
            .with_field(Field::new(
                EVENT_TIME_END_FIELD,
                [
                    FieldValue::from(start + 15 * MINUTE),
                    FieldValue::Null,
                    FieldValue::from(start + 52 * MINUTE),
                ],
            ))
            .with_field(Field::new(VALUE_FIELD, [35.0, 72.0, 91.0]).with_config(load)),
    );
    series
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let now = chrono::Utc::now().timestamp_millis();
    let start = now - 60 * MINUTE;
    let series = load_series(start);
    let window = TimeWindow::new(start, now).expect("window");

    let options = PanelOptions {
        headers: "Region|Rack|Host".to_string(),
        ..PanelOptions::default()
    };
    let mut panel = TopologyPanel::builder()
        .options(options)
        .theme(Theme::dark())
        .build()
        .expect("panel options");
    panel.set_data(series.clone(), window);

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(1_100.0), px(420.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_, cx| {
            cx.new(|_| {
                let view = GpuiTopologyView::new(panel);
                let handle = view.panel_handle();
                view.on_time_range(move |range, _| {
                    tracing::info!(from = range.from(), to = range.to(), "zooming to range");
                    handle.write(|panel| panel.set_data(series.clone(), range));
                })
            })
        })
        .unwrap();
    });
}
