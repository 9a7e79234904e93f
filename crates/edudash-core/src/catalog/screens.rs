//! Standard dashboard screens.

use crate::access::{PERMISSIONS_COLLECTION, Section};
use crate::schema::{FieldSpec, RecordSchema};

use super::Screen;
use super::validators;

const SOCIAL_PLATFORMS: &[&str] = &["instagram", "linkedin", "youtube", "x", "facebook"];

pub(super) fn standard_screens() -> Vec<Screen> {
    vec![
        courses(),
        Screen::list(
            "course_benefits",
            "Course benefits",
            Section::Courses,
            RecordSchema::new("benefit")
                .field(FieldSpec::text("title").required())
                .field(FieldSpec::text("description")),
            "b",
        ),
        Screen::list(
            "course_curriculum",
            "Curriculum",
            Section::Courses,
            RecordSchema::new("curriculum section")
                .field(FieldSpec::text("title").required())
                .field(FieldSpec::text("summary"))
                .field(FieldSpec::number("lessons").validate_with(validators::whole_number)),
            "cs",
        ),
        Screen::list(
            "course_timeline",
            "Timeline",
            Section::Courses,
            RecordSchema::new("timeline entry")
                .field(FieldSpec::text("label").required())
                .field(FieldSpec::date("date").required())
                .field(FieldSpec::text("note")),
            "tl",
        ),
        mentors(),
        promo_codes(),
        Screen::single(
            "hero",
            "Home hero",
            Section::HomeContent,
            RecordSchema::new("hero")
                .field(FieldSpec::text("heading").required())
                .field(FieldSpec::text("subheading"))
                .field(FieldSpec::text("cta_label"))
                .field(FieldSpec::text("cta_url").validate_with(validators::url))
                .field(FieldSpec::text("image_url").validate_with(validators::url)),
        ),
        Screen::list(
            "faqs",
            "FAQ",
            Section::HomeContent,
            RecordSchema::new("faq")
                .field(FieldSpec::text("question").required())
                .field(FieldSpec::text("answer").required()),
            "faq",
        ),
        Screen::list(
            "testimonials",
            "Testimonials",
            Section::HomeContent,
            RecordSchema::new("testimonial")
                .field(FieldSpec::text("name").required())
                .field(FieldSpec::text("quote").required())
                .field(FieldSpec::text("headline"))
                .field(FieldSpec::number("rating").validate_with(validators::in_range(1.0, 5.0))),
            "t",
        ),
        Screen::list(
            "partners",
            "Partners",
            Section::HomeContent,
            RecordSchema::new("partner")
                .field(FieldSpec::text("name").required())
                .field(FieldSpec::text("logo_url").required().validate_with(validators::url))
                .field(FieldSpec::text("website").validate_with(validators::url)),
            "p",
        ),
        Screen::list(
            "social_posts",
            "Social posts",
            Section::HomeContent,
            RecordSchema::new("social post")
                .field(
                    FieldSpec::text("platform")
                        .required()
                        .validate_with(validators::one_of(SOCIAL_PLATFORMS)),
                )
                .field(FieldSpec::text("url").required().validate_with(validators::url))
                .field(FieldSpec::text("caption")),
            "s",
        ),
        Screen::single(
            "users",
            "Users",
            Section::Users,
            RecordSchema::new("user")
                .field(FieldSpec::text("full_name").required())
                .field(FieldSpec::text("email").required().validate_with(validators::email))
                .field(FieldSpec::text("phone"))
                .field(FieldSpec::boolean("blocked")),
        ),
        Screen::single(
            PERMISSIONS_COLLECTION,
            "Admin permissions",
            Section::Permissions,
            RecordSchema::with_id_field("admin permission", "email")
                .field(FieldSpec::text("role").required().validate_with(validators::role))
                .field(FieldSpec::text_list("sections").validate_with(validators::sections)),
        ),
    ]
}

fn courses() -> Screen {
    Screen::single(
        "courses",
        "Courses",
        Section::Courses,
        RecordSchema::new("course")
            .field(FieldSpec::text("title").required())
            .field(FieldSpec::text("slug").required().validate_with(validators::slug))
            .field(FieldSpec::number("fee").required().validate_with(validators::non_negative))
            .field(FieldSpec::number("discounted_fee").validate_with(validators::non_negative))
            .field(FieldSpec::text("duration"))
            .field(FieldSpec::text("mode").validate_with(validators::one_of(&[
                "online", "offline", "hybrid",
            ])))
            .field(FieldSpec::date("start_date"))
            .field(FieldSpec::text("mentor_id"))
            .field(FieldSpec::text("description"))
            .field(FieldSpec::boolean("published")),
    )
}

fn mentors() -> Screen {
    Screen::single(
        "mentors",
        "Mentors",
        Section::Mentors,
        RecordSchema::new("mentor")
            .field(FieldSpec::text("name").required())
            .field(FieldSpec::text("designation").required())
            .field(FieldSpec::text("company"))
            .field(FieldSpec::number("experience_years").validate_with(validators::non_negative))
            .field(FieldSpec::text("bio"))
            .field(FieldSpec::text("linkedin_url").validate_with(validators::url))
            .field(FieldSpec::text("photo_url").validate_with(validators::url)),
    )
}

fn promo_codes() -> Screen {
    Screen::single(
        "promo_codes",
        "Promo codes",
        Section::PromoCodes,
        RecordSchema::new("promo code")
            .field(FieldSpec::text("code").required().validate_with(validators::promo_code))
            .field(
                FieldSpec::number("discount_percent")
                    .required()
                    .validate_with(validators::in_range(1.0, 100.0)),
            )
            .field(FieldSpec::number("max_uses").validate_with(validators::whole_number))
            .field(FieldSpec::date("expires_on"))
            .field(FieldSpec::text("course_id"))
            .field(FieldSpec::boolean("active")),
    )
}
