use js_sys::Date;
use yew::prelude::*;

pub fn render_footer() -> Html {
    let year = Date::new_0().get_full_year();
    html! {
        <footer class="app-footer">
            <p>{ format!("© {} SmartBloom. Built with ❤️ for plants.", year) }</p>
        </footer>
    }
}
