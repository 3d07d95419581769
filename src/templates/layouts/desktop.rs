use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 0 auto; padding: 0 1rem 2rem; }
header { display: flex; gap: 1rem; align-items: center; }
header nav ul { list-style: none; display: flex; gap: 1rem; padding: 0; }
.search-form { display: grid; grid-template-columns: max-content 1fr; gap: 0.5rem 1rem; }
.search-form fieldset, .search-form .checkbox, .search-form button { grid-column: 1 / -1; }
.notice-error { color: #a40000; }
.notice-warn { color: #8a5a00; }
table.listings { border-collapse: collapse; width: 100%; margin: 1rem 0; }
table.listings th, table.listings td { border-bottom: 1px solid #ddd; padding: 0.4rem; text-align: left; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Rental Scout" }
                style { (PreEscaped(STYLE)) }
            }
            body {
              header class="flex items-center justify-between px-6 py-3 shadow" {
                  svg
                      xmlns="http://www.w3.org/2000/svg"
                      width="24"
                      height="24"
                      viewBox="0 0 24 24"
                      fill="none"
                      stroke="#524ed2"
                      stroke-width="2"
                      stroke-linecap="round"
                      stroke-linejoin="round"
                      class="icon icon-tabler icon-tabler-home"
                  {
                      path stroke="none" d="M0 0h24v24H0z" fill="none" {}
                      path d="M5 12l-2 0l9 -9l9 9l-2 0" {}
                      path d="M5 12v7a2 2 0 0 0 2 2h10a2 2 0 0 0 2 -2v-7" {}
                      path d="M9 21v-6a2 2 0 0 1 2 -2h2a2 2 0 0 1 2 2v6" {}
                  }
                  h3 { "Rental Scout" }
                  nav {
                      ul {
                          li { a href="/" { "New search" } }
                      }
                  }
              }
                (content)
            }
        }
    }
}
