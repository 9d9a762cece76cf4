// Demo data loaded into an empty database

use color_eyre::Result;

use super::models::JsonList;
use super::Db;
use crate::services::auth::PasswordScheme;

struct SeedCourse {
    id: i64,
    name: &'static str,
    description: &'static str,
    faculty: &'static str,
}

struct SeedUser {
    email: &'static str,
    password: &'static str,
    name: &'static str,
    /// `None` for students.
    subjects: Option<&'static [i64]>,
}

const COURSES: &[SeedCourse] = &[
    SeedCourse {
        id: 1,
        name: "Data Structures",
        description: "Learn fundamental data structures and algorithms",
        faculty: "Prof. Kaminee Patil",
    },
    SeedCourse {
        id: 2,
        name: "Open Electives",
        description: "Explore various elective subjects",
        faculty: "Dr. Pradip Patil",
    },
    SeedCourse {
        id: 3,
        name: "Economic and Finance Management",
        description: "Understanding economics and financial management",
        faculty: "Dr. Pankaj Bavisker",
    },
    SeedCourse {
        id: 4,
        name: "Operating System",
        description: "Core concepts of operating systems",
        faculty: "Prof. Priyanka Lanjewar",
    },
];

const USERS: &[SeedUser] = &[
    SeedUser {
        email: "student@rc.edu",
        password: "123",
        name: "Kanchan Patil",
        subjects: None,
    },
    SeedUser {
        email: "kaminee@rc.edu",
        password: "12345",
        name: "Prof. Kaminee Patil",
        subjects: Some(&[1]),
    },
    SeedUser {
        email: "pradip@rc.edu",
        password: "12345",
        name: "Dr. Pradip Patil",
        subjects: Some(&[2]),
    },
    SeedUser {
        email: "pankajb@rc.edu",
        password: "12345",
        name: "Dr. Pankaj Bavisker",
        subjects: Some(&[3]),
    },
    SeedUser {
        email: "priyanka@rc.edu",
        password: "12345",
        name: "Prof. Priyanka Lanjewar",
        subjects: Some(&[4]),
    },
];

impl Db {
    /// Populate courses and users when their tables are empty.
    ///
    /// Courses go first so the demo student is enrolled in all of them.
    pub async fn seed_demo_data(&self, scheme: &PasswordScheme) -> Result<()> {
        if self.course_count().await? == 0 {
            for course in COURSES {
                self.create_course(Some(course.id), course.name, course.description, course.faculty)
                    .await?;
            }
            tracing::info!("seeded {} courses", COURSES.len());
        }

        if self.user_count().await? == 0 {
            for user in USERS {
                let email = crate::utils::normalize_email(user.email);
                let secret = scheme.seal(user.password)?;
                match user.subjects {
                    Some(subjects) => {
                        let subjects = JsonList(subjects.to_vec());
                        self.create_faculty(&email, &secret, user.name, &subjects)
                            .await?;
                    }
                    None => {
                        self.register_student(&email, &secret, user.name).await?;
                    }
                }
            }
            tracing::info!("seeded {} users", USERS.len());
        }

        Ok(())
    }
}
