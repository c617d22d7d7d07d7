/// On-screen controls: placement buttons floating over the video and the
/// style panel beside it.

use iced::widget::{button, column, container, row, text, tooltip, Column, Space};
use iced::{Alignment, Element, Length, Pixels, Theme};
use iced_aw::Wrap;

use crate::state::catalog::Catalog;
use crate::state::transform::Axis;
use crate::Message;

/// Diameter of a circular control
const CONTROL_SIZE: f32 = 48.0;
const PAD_SPACING: f32 = 12.0;

type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

/// Round icon button with a hover label
fn circular_control<'a>(label: &'a str, glyph: &'a str, message: Message) -> Element<'a, Message> {
    let control = button(container(text(glyph).size(20)).center(Length::Fill))
        .width(Length::Fixed(CONTROL_SIZE))
        .height(Length::Fixed(CONTROL_SIZE))
        .padding(0)
        .style(|theme, status| {
            let mut style = button::secondary(theme, status);
            style.border = style.border.rounded(CONTROL_SIZE / 2.0);
            style
        })
        .on_press(message);

    tooltip(control, text(label).size(14), tooltip::Position::Top).into()
}

fn gap<'a>() -> Element<'a, Message> {
    Space::new(Length::Fixed(CONTROL_SIZE), Length::Fixed(CONTROL_SIZE)).into()
}

/// 3x3 move pad: up, left, right, down around a center badge
pub fn position_pad<'a>(step: f32) -> Element<'a, Message> {
    let badge = button(container(text("👓").size(20)).center(Length::Fill))
        .width(Length::Fixed(CONTROL_SIZE))
        .height(Length::Fixed(CONTROL_SIZE))
        .padding(0)
        .style(|theme, status| {
            let mut style = button::primary(theme, status);
            style.border = style.border.rounded(CONTROL_SIZE / 2.0);
            style
        });

    column![
        row![
            gap(),
            circular_control("Move Up", "↑", Message::Move(Axis::Y, -step)),
            gap(),
        ]
        .spacing(PAD_SPACING),
        row![
            circular_control("Move Left", "←", Message::Move(Axis::X, -step)),
            badge,
            circular_control("Move Right", "→", Message::Move(Axis::X, step)),
        ]
        .spacing(PAD_SPACING),
        row![
            gap(),
            circular_control("Move Down", "↓", Message::Move(Axis::Y, step)),
            gap(),
        ]
        .spacing(PAD_SPACING),
    ]
    .spacing(PAD_SPACING)
    .into()
}

pub fn zoom_controls<'a>(step: f32) -> Element<'a, Message> {
    column![
        circular_control("Zoom In", "+", Message::Scale(step)),
        circular_control("Zoom Out", "−", Message::Scale(-step)),
    ]
    .spacing(16)
    .into()
}

pub fn rotation_controls<'a>(step: f32) -> Element<'a, Message> {
    column![
        circular_control("Rotate Left", "⟲", Message::Rotate(-step)),
        circular_control("Rotate Right", "⟳", Message::Rotate(step)),
    ]
    .spacing(16)
    .into()
}

/// Style picker, upload button and status line.
/// Shows only a loading indicator while the remote catalog is pending.
pub fn style_panel<'a>(catalog: &'a Catalog, status: &'a str) -> Element<'a, Message> {
    let title = text("Glasses Style").size(28);

    if catalog.is_loading() {
        return column![title, text("Loading eyewear catalog...").size(18)]
            .spacing(24)
            .into();
    }

    let selected = catalog.selected();
    let name = selected
        .map(|entry| entry.name.as_str())
        .unwrap_or("No styles available");

    let navigation = row![
        button(text("‹").size(24))
            .on_press(Message::PreviousStyle)
            .padding([4, 16]),
        container(text(name).size(20)).center_x(Length::Fill),
        button(text("›").size(24))
            .on_press(Message::NextStyle)
            .padding([4, 16]),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let mut panel: Column<Message> = column![title, navigation].spacing(24);

    if let Some(price) = selected.and_then(|entry| entry.price.as_deref()) {
        panel = panel.push(container(text(price).size(18)).center_x(Length::Fill));
    }

    let styles: Vec<Element<Message>> = catalog
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let style: ButtonStyle = if catalog.selected_index() == Some(index) {
                button::primary
            } else {
                button::secondary
            };
            button(text(entry.name.as_str()).size(14))
                .style(style)
                .on_press(Message::SelectStyle(entry.id.clone()))
                .into()
        })
        .collect();

    panel
        .push(Wrap::with_elements(styles).spacing(Pixels(8.0)).line_spacing(Pixels(8.0)))
        .push(
            button(container(text("Upload Custom Glasses").size(16)).center_x(Length::Fill))
                .on_press(Message::UploadRequested)
                .width(Length::Fill)
                .padding(16),
        )
        .push(text(status).size(14))
        .into()
}

/// Usage hints shown under the style panel
pub fn quick_tips<'a>() -> Element<'a, Message> {
    column![
        text("Quick Tips").size(22),
        text("• Use the circular controls to adjust position"),
        text("• Zoom in/out using the right side buttons"),
        text("• Rotate using the left side buttons"),
        text("• Upload your own glasses design"),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .into()
}
