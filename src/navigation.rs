//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// Only one link should be current at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block rounded px-3 py-2 text-sm font-semibold text-blue-700 bg-blue-50
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "block rounded px-3 py-2 text-sm text-gray-700 hover:bg-gray-100
            hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800
            dark:hover:text-blue-200"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

/// Links that belong together, e.g. the record listings.
struct Section<'a> {
    title: &'a str,
    links: Vec<Link<'a>>,
}

impl Section<'_> {
    fn is_current(&self) -> bool {
        self.links.iter().any(|link| link.is_current)
    }
}

const SECTIONS: [(&str, &[(&str, &str)]); 3] = [
    (
        "Records",
        &[
            (endpoints::PASSENGERS_VIEW, "Passengers"),
            (endpoints::STATIONS_VIEW, "Stations"),
            (endpoints::VEHICLES_VIEW, "Vehicles"),
            (endpoints::TICKETS_VIEW, "Tickets"),
            (endpoints::PASSES_VIEW, "Passes"),
            (endpoints::COMPLAINTS_VIEW, "Complaints"),
        ],
    ),
    (
        "Analytics",
        &[
            (endpoints::REPORTS_VIEW, "Reports"),
            (endpoints::QUERIES_VIEW, "Queries"),
        ],
    ),
    (
        "Database",
        &[
            (endpoints::PROCEDURES_VIEW, "Procedures"),
            (endpoints::FUNCTIONS_VIEW, "Functions"),
            (endpoints::TRIGGERS_VIEW, "Triggers"),
        ],
    ),
];

pub struct NavBar<'a> {
    sections: Vec<Section<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link and its section
    /// are marked as current.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let sections = SECTIONS
            .iter()
            .map(|&(title, links)| Section {
                title,
                links: links
                    .iter()
                    .map(|&(url, title)| Link {
                        url,
                        title,
                        is_current: active_endpoint == url,
                    })
                    .collect(),
            })
            .collect();

        NavBar { sections }
    }

    pub fn into_html(self) -> Markup {
        let section_label_class = |is_current: bool| -> &'static str {
            if is_current {
                "px-3 text-xs font-semibold uppercase tracking-wide text-blue-700 dark:text-blue-300"
            } else {
                "px-3 text-xs font-semibold uppercase tracking-wide text-gray-500 dark:text-gray-400"
            }
        };

        html!(
            nav class="bg-white border-b border-gray-200 dark:bg-gray-900 dark:border-gray-700"
            {
                div class="max-w-screen-xl mx-auto flex flex-wrap items-center justify-between gap-4 p-4"
                {
                    a href=(endpoints::ROOT) class="text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Transit Admin"
                    }

                    details class="peer lg:hidden"
                    {
                        summary
                            class="list-none [&::-webkit-details-marker]:hidden cursor-pointer
                            rounded px-3 py-2 text-sm font-semibold text-gray-700
                            hover:bg-gray-100 dark:text-gray-200 dark:hover:bg-gray-800"
                        {
                            "Menu"
                        }
                    }

                    div class="hidden w-full peer-open:block lg:flex lg:w-auto lg:items-start lg:gap-6"
                    {
                        @for section in self.sections {
                            @let is_current = section.is_current();
                            div
                                class="py-2 lg:py-0"
                                data-nav-section=(section.title)
                                data-current=[is_current.then_some("true")]
                            {
                                p class=(section_label_class(is_current)) { (section.title) }

                                ul class="flex flex-wrap gap-1 mt-1"
                                {
                                    @for link in section.links {
                                        li { (link.into_html()) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        )
    }
}
