use crate::catalog::Project;

pub fn render_index(projects: &[Project]) -> String {
    let cards: String = projects.iter().map(render_card).collect();
    INDEX_HTML
        .replace("{{COUNT}}", &projects.len().to_string())
        .replace("{{CARDS}}", &cards)
}

fn render_card(project: &Project) -> String {
    format!(
        r#"
      <a class="card" href="{link}">
        <span class="tag">{assignment}</span>
        <h2>{title}</h2>
        <p>{description}</p>
        <time datetime="{date}">{date}</time>
      </a>"#,
        link = escape_html(project.link),
        assignment = escape_html(project.assignment),
        title = escape_html(project.title),
        description = escape_html(project.description),
        date = escape_html(project.date),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Coursework Hub</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 16px;
    }

    .card {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
      color: inherit;
      text-decoration: none;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    .card:hover {
      transform: translateY(-2px);
      box-shadow: 0 12px 24px rgba(47, 72, 88, 0.12);
    }

    .card h2 {
      margin: 0;
      font-size: 1.1rem;
      color: var(--accent-2);
    }

    .card p {
      margin: 0;
      color: #6b645d;
    }

    .tag {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: var(--accent);
    }

    time {
      font-size: 0.85rem;
      color: #8b857d;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Coursework Hub</h1>
      <p class="subtitle">{{COUNT}} demos. Each card opens its JSON endpoint.</p>
    </header>
    <section class="grid">{{CARDS}}
    </section>
  </main>
</body>
</html>
"#;
