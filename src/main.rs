mod api;
mod app;
mod model;
mod view;

use app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
