//! Font Awesome icons shown next to tech-stack tags.

const TECH_STACK_ICONS: &[(&str, &str)] = &[
    ("Azure", r#"<i class="fa-solid fa-cloud"></i>"#),
    ("Azure AD", r#"<i class="fa-solid fa-address-book"></i>"#),
    ("Bash", r#"<i class="fa-solid fa-terminal"></i>"#),
    ("Celery", r#"<i class="fa-solid fa-sliders"></i>"#),
    ("Crowdstrike", r#"<i class="fa-solid fa-database"></i>"#),
    ("Dash", r#"<i class="fa-solid fa-chart-line"></i>"#),
    ("Dask", r#"<i class="fa-solid fa-sitemap"></i>"#),
    ("Docker", r#"<i class="fa-brands fa-docker"></i>"#),
    ("Elasticsearch", r#"<i class="fa-brands fa-searchengin"></i>"#),
    ("Energyworx", r#"<i class="fa-solid fa-lightbulb"></i>"#),
    ("FastAPI", r#"<i class="fa-solid fa-microchip"></i>"#),
    ("Flask", r#"<i class="fa-solid fa-microchip"></i>"#),
    ("GCP", r#"<i class="fa-solid fa-cloud"></i>"#),
    ("Git", r#"<i class="fa-brands fa-git-alt"></i>"#),
    ("GoGS", r#"<i class="fa-solid fa-gear"></i>"#),
    ("Groovy", r#"<i class="fa-solid fa-code"></i>"#),
    ("KVM", r#"<i class="fa-solid fa-server"></i>"#),
    ("Keras", r#"<i class="fa-solid fa-brain"></i>"#),
    ("Latex", r#"<i class="fa-regular fa-file-lines"></i>"#),
    ("Matplotlib", r#"<i class="fa-solid fa-brush"></i>"#),
    ("Numpy", r#"<i class="fa-solid fa-list-ol"></i>"#),
    ("OpenCV", r#"<i class="fa-solid fa-eye"></i>"#),
    ("Pandas", r#"<i class="fa-solid fa-receipt"></i>"#),
    ("PowerBI", r#"<i class="fa-solid fa-paint-roller"></i>"#),
    ("Python", r#"<i class="fa-brands fa-python"></i>"#),
    ("Pytorch", r#"<i class="fa-solid fa-fire"></i>"#),
    ("R", r#"<i class="fa-brands fa-r-project"></i>"#),
    ("RedHat", r#"<i class="fa-brands fa-redhat"></i>"#),
    ("RShiny", r#"<i class="fa-solid fa-wand-magic-sparkles"></i>"#),
    ("Rust", r#"<i class="fa-brands fa-rust"></i>"#),
    ("SQL", r#"<i class="fa-solid fa-person-digging"></i>"#),
    ("Scipy", r#"<i class="fa-solid fa-magnifying-glass-chart"></i>"#),
    ("Spark", r#"<i class="fa-solid fa-magnifying-glass-chart"></i>"#),
    ("Sphinx", r#"<i class="fa-solid fa-book"></i>"#),
    ("Splunk", r#"<i class="fa-solid fa-database"></i>"#),
    ("Statsmodels", r#"<i class="fa-solid fa-brain"></i>"#),
    ("TKinter", r#"<i class="fa-solid fa-table-columns"></i>"#),
    ("VBA", r#"<i class="fa-solid fa-code"></i>"#),
    ("Xarray", r#"<i class="fa-solid fa-layer-group"></i>"#),
];

/// Icon markup for a tech tag, matched exactly.
pub fn icon_for(tech: &str) -> Option<&'static str> {
    TECH_STACK_ICONS
        .iter()
        .find(|(name, _)| *name == tech)
        .map(|(_, icon)| *icon)
}
