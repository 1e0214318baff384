use anyhow::Context;
use chart::ScatterChart;
use iced::{
    widget::{
        button, canvas::Canvas, column, container, row, slider, text, Column, Container, Row,
    },
    Alignment, Element, Length, Task, Theme,
};
use tipscore::dataset::{smoker_label, SMOKER_VALUES};
use tipscore::{Category, Dashboard, Dataset, Day, FilterEvent, Gender, Service};

mod chart;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let dataset = Dataset::bundled().context("loading bundled tipping dataset")?;

    iced::application(
        move || TipsDashboard::boot(dataset.clone()),
        TipsDashboard::update,
        TipsDashboard::view,
    )
    .title(application_title)
    .theme(application_theme)
    .run()
    .context("running dashboard window")
}

fn application_title(_: &TipsDashboard) -> String {
    "Restaurant Tipping Analysis".into()
}

fn application_theme(_: &TipsDashboard) -> Theme {
    Theme::Dark
}

struct TipsDashboard {
    dashboard: Dashboard,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Filter(FilterEvent),
}

impl TipsDashboard {
    fn boot(dataset: Dataset) -> (Self, Task<Message>) {
        let dashboard = Dashboard::new(dataset);
        let status = format!("Loaded {} records", dashboard.dataset().len());
        (Self { dashboard, status }, Task::none())
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Filter(event) => {
                let snapshot = state.dashboard.dispatch(event);
                state.status = if matches!(event, FilterEvent::Reset) {
                    "Filters reset".into()
                } else {
                    format!("{} of {} records match", snapshot.matched, snapshot.total)
                };
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let filter = state.dashboard.filter();
        let defaults = state.dashboard.defaults();
        let snapshot = state.dashboard.snapshot();
        let (bill_lo, bill_hi) = (defaults.bill.min(), defaults.bill.max());
        let (size_lo, size_hi) = (defaults.party_size.min(), defaults.party_size.max());

        let sidebar = column![
            text("Filters").size(26),
            text(format!(
                "Bill amount: ${:.0} - ${:.0}",
                filter.bill.min(),
                filter.bill.max()
            ))
            .size(16),
            slider(bill_lo..=bill_hi, filter.bill.min(), |value| {
                Message::Filter(FilterEvent::BillMin(value))
            })
            .step(1.0),
            slider(bill_lo..=bill_hi, filter.bill.max(), |value| {
                Message::Filter(FilterEvent::BillMax(value))
            })
            .step(1.0),
            text("Food service").size(16),
            Service::ALL.iter().fold(Row::new().spacing(6), |row, service| {
                let category = Category::Service(*service);
                row.push(toggle(service.label(), filter.is_selected(category), category))
            }),
            text("Gender").size(16),
            Gender::ALL.iter().fold(Row::new().spacing(6), |row, gender| {
                let category = Category::Gender(*gender);
                row.push(toggle(gender.label(), filter.is_selected(category), category))
            }),
            text("Smoker status").size(16),
            SMOKER_VALUES.iter().fold(Row::new().spacing(6), |row, smoker| {
                let category = Category::Smoker(*smoker);
                row.push(toggle(
                    smoker_label(*smoker),
                    filter.is_selected(category),
                    category,
                ))
            }),
            text("Day of the week").size(16),
            Day::ALL.iter().fold(Row::new().spacing(6), |row, day| {
                let category = Category::Day(*day);
                row.push(toggle(day.label(), filter.is_selected(category), category))
            }),
            text(format!(
                "Party size: {} - {}",
                filter.party_size.min(),
                filter.party_size.max()
            ))
            .size(16),
            slider(size_lo..=size_hi, filter.party_size.min(), |value| {
                Message::Filter(FilterEvent::PartyMin(value))
            })
            .step(1u32),
            slider(size_lo..=size_hi, filter.party_size.max(), |value| {
                Message::Filter(FilterEvent::PartyMax(value))
            })
            .step(1u32),
            button("Reset filter")
                .on_press(Message::Filter(FilterEvent::Reset))
                .padding(10),
            text(&state.status).size(14),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(340.0));

        let metrics = &snapshot.metrics;
        let summary = column![
            text("Sales Summary").size(26),
            row![
                metric_card(
                    "Total Sales",
                    format!("{} / {}", metrics.sales_label(), metrics.total_sales_label()),
                ),
                metric_card("Average Tip", metrics.average_tip_label()),
                metric_card("Highest Tip", metrics.highest_tip_label()),
                metric_card("Lowest Tip", metrics.lowest_tip_label()),
            ]
            .spacing(12),
        ]
        .spacing(10);

        let chart = Canvas::new(ScatterChart::new(&snapshot.plot))
            .width(Length::Fill)
            .height(Length::Fixed(380.0));

        let legend = if snapshot.plot.trend.is_some() {
            text("Red line: least-squares line of best fit").size(12)
        } else {
            text("Line of best fit needs at least two distinct bill amounts").size(12)
        };

        let main_column = column![summary, chart, legend]
            .spacing(16)
            .padding(16)
            .width(Length::Fill);

        let layout = row![sidebar, main_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn toggle<'a>(label: &'a str, selected: bool, category: Category) -> Element<'a, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if selected {
        button::primary
    } else {
        button::secondary
    };
    button(text(label).size(14))
        .on_press(Message::Filter(FilterEvent::Toggle(category)))
        .style(style)
        .padding([4, 10])
        .into()
}

fn metric_card<'a>(title: &'a str, value: String) -> Element<'a, Message> {
    Container::new(
        Column::new()
            .push(text(title).size(14))
            .push(text(value).size(22))
            .spacing(6),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}
