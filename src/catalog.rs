use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Project {
    pub id: u32,
    pub title: &'static str,
    pub assignment: &'static str,
    pub description: &'static str,
    pub link: &'static str,
    pub date: &'static str,
}

/// Dashboard entries in display order. New demos go at the end.
pub const PROJECTS: &[Project] = &[
    Project {
        id: 1,
        title: "Assignment 1: Modular Addition",
        assignment: "Assignment 1",
        description: "Add two validated numbers.",
        link: "/api/calc/sum?a=2&b=3",
        date: "2026-01-17",
    },
    Project {
        id: 2,
        title: "1. Simple Calculator",
        assignment: "Assignment 02",
        description: "Arithmetic operations by operator.",
        link: "/api/calc/arith?a=6&b=3&op=*",
        date: "2026-01-18",
    },
    Project {
        id: 3,
        title: "2. Even or Odd",
        assignment: "Assignment 02",
        description: "Modulus operator checker.",
        link: "/api/calc/parity?n=7",
        date: "2026-01-18",
    },
    Project {
        id: 4,
        title: "3. Age Calculator",
        assignment: "Assignment 02",
        description: "Birth year calc & voting eligibility.",
        link: "/api/calc/voting?birth_year=2000",
        date: "2026-01-18",
    },
    Project {
        id: 5,
        title: "4. Grade Calculator",
        assignment: "Assignment 02",
        description: "Calculate percentage and grade.",
        link: "/api/calc/grade?m1=80&m2=75&m3=90",
        date: "2026-01-18",
    },
    Project {
        id: 6,
        title: "5. Library Logic",
        assignment: "Assignment 02",
        description: "Logical operators challenge (&& || !).",
        link: "/api/calc/library?has_card=true&is_student=true",
        date: "2026-01-18",
    },
    Project {
        id: 7,
        title: "Attendance System",
        assignment: "Assignment 4",
        description: "Students, daily marks and attendance analytics.",
        link: "/api/attendance/analytics",
        date: "2026-02-07",
    },
    Project {
        id: 8,
        title: "Expense Tracker",
        assignment: "Assignment 4",
        description: "Income, expenses and monthly category breakdown.",
        link: "/api/expenses/summary",
        date: "2026-02-07",
    },
    Project {
        id: 9,
        title: "Day 1: Counter App",
        assignment: "Assignment 1",
        description: "Increase and decrease a counter.",
        link: "/api/counter",
        date: "2026-01-17",
    },
];

pub fn projects() -> &'static [Project] {
    PROJECTS
}
